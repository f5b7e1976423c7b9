//! Arithmetic and comparison operators.

use cinder_ir::Expr;

use super::{expect_args, same_type};
use crate::types::{is_float, is_integer};
use crate::version::Register;
use crate::{CompileError, Context};

/// Compiles both operands eagerly and checks they share a numeric type.
fn operands(node: &Expr, ctx: &mut Context) -> Result<(String, Register, Register), CompileError> {
    let args = expect_args(node, 2)?;
    let (mut out, lhs) = ctx.emit_value(args[0])?;
    let (code, rhs) = ctx.emit_value(args[1])?;
    out.push_str(&code);
    same_type(&lhs.ty, &rhs.ty, args[1])?;
    if !is_integer(&lhs.ty) && !is_float(&lhs.ty) {
        return Err(CompileError::TypeMismatch {
            expected: "a numeric type".to_string(),
            found: lhs.ty,
            pos: args[0].pos,
        });
    }
    Ok((out, lhs, rhs))
}

/// `(op a b)` with an integer and a floating-point instruction.
pub(super) fn arith(
    int_op: &'static str,
    float_op: &'static str,
) -> impl Fn(&Expr, &mut Context) -> Result<String, CompileError> {
    move |node, ctx| {
        let (mut out, lhs, rhs) = operands(node, ctx)?;
        let instr = if is_float(&lhs.ty) { float_op } else { int_op };
        let res = ctx.versions.unique_res(&lhs.ty);
        out.push_str(&format!(
            "{} = {} {} {}, {}\n",
            res, instr, lhs.ty, lhs.name, rhs.name
        ));
        Ok(out)
    }
}

/// `(op a b)` producing an `i1`.
pub(super) fn compare(
    int_pred: &'static str,
    float_pred: &'static str,
) -> impl Fn(&Expr, &mut Context) -> Result<String, CompileError> {
    move |node, ctx| {
        let (mut out, lhs, rhs) = operands(node, ctx)?;
        let (instr, pred) = if is_float(&lhs.ty) {
            ("fcmp", float_pred)
        } else {
            ("icmp", int_pred)
        };
        let res = ctx.versions.unique_res("i1");
        out.push_str(&format!(
            "{} = {} {} {} {}, {}\n",
            res, instr, pred, lhs.ty, lhs.name, rhs.name
        ));
        Ok(out)
    }
}
