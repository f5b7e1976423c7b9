//! Boolean operators.

use cinder_ir::Expr;

use super::{expect_args, same_type};
use crate::{CompileError, Context};

/// `(and a b)` / `(or a b)`. Both operands are evaluated.
pub(super) fn logic(instr: &'static str) -> impl Fn(&Expr, &mut Context) -> Result<String, CompileError> {
    move |node, ctx| {
        let args = expect_args(node, 2)?;
        let (mut out, lhs) = ctx.emit_value(args[0])?;
        same_type("i1", &lhs.ty, args[0])?;
        let (code, rhs) = ctx.emit_value(args[1])?;
        out.push_str(&code);
        same_type("i1", &rhs.ty, args[1])?;
        let res = ctx.versions.unique_res("i1");
        out.push_str(&format!("{} = {} i1 {}, {}\n", res, instr, lhs.name, rhs.name));
        Ok(out)
    }
}

pub(super) fn not(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let args = expect_args(node, 1)?;
    let (mut out, value) = ctx.emit_value(args[0])?;
    same_type("i1", &value.ty, args[0])?;
    let res = ctx.versions.unique_res("i1");
    out.push_str(&format!("{} = xor i1 {}, true\n", res, value.name));
    Ok(out)
}
