//! Control forms.

use cinder_ir::Expr;

use super::{emit_sequence, expect_args, expect_at_least, same_type};
use crate::codegen::{alloca, load, store};
use crate::version::Register;
use crate::{CompileError, Context};

/// `(if cond then else)`: only the taken branch runs. Both branches store
/// into one scratch slot which is loaded after they join.
pub(super) fn if_(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let args = expect_args(node, 3)?;
    let (mut out, cond) = ctx.emit_value(args[0])?;
    same_type("i1", &cond.ty, args[0])?;

    let then_label = ctx.versions.unique_label();
    let else_label = ctx.versions.unique_label();
    let end_label = ctx.versions.unique_label();

    let (then_code, then_reg) = branch(args[1], ctx)?;
    let (else_code, else_reg) = branch(args[2], ctx)?;
    same_type(&then_reg.ty, &else_reg.ty, args[2])?;
    let ty = then_reg.ty;

    let slot = ctx.versions.unique_tmp();
    out.push_str(&alloca(&slot, &ty));
    out.push_str(&format!(
        "br i1 {}, label %{}, label %{}\n",
        cond.name, then_label, else_label
    ));

    out.push_str(&format!("{}:\n", then_label));
    out.push_str(&then_code);
    out.push_str(&store(&ty, &then_reg.name, &slot));
    out.push_str(&format!("br label %{}\n", end_label));

    out.push_str(&format!("{}:\n", else_label));
    out.push_str(&else_code);
    out.push_str(&store(&ty, &else_reg.name, &slot));
    out.push_str(&format!("br label %{}\n", end_label));

    out.push_str(&format!("{}:\n", end_label));
    let res = ctx.versions.unique_res(&ty);
    out.push_str(&load(&res, &ty, &slot));
    Ok(out)
}

/// Each branch is its own scope; nothing it binds is visible past the join.
fn branch(form: &Expr, ctx: &mut Context) -> Result<(String, Register), CompileError> {
    ctx.scopes.enter_scope();
    let value = ctx.emit_value(form)?;
    ctx.scopes.exit_scope();
    Ok(value)
}

/// `(begin form ...)`: evaluates in order, yielding the last value.
pub(super) fn begin(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let forms = expect_at_least(node, 1)?;
    emit_sequence(&forms, ctx)
}
