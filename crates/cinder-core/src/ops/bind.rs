//! Variable binding forms.

use cinder_ir::Expr;

use super::{emit_sequence, expect_args, expect_at_least, same_type, symbol_name};
use crate::codegen::store;
use crate::scope::{Binding, BindingKind};
use crate::{CompileError, Context};

/// Evaluates `value` and binds it to `name` in the current scope.
fn bind(name_expr: &Expr, value: &Expr, constant: bool, ctx: &mut Context) -> Result<String, CompileError> {
    let name = symbol_name(name_expr, "binding name")?;
    let (mut out, reg) = ctx.emit_value(value)?;

    if let Some(existing) = ctx.scopes.lookup_local(name).cloned() {
        if existing.kind == BindingKind::Variable {
            // Same scope: reuse the slot
            if existing.constant {
                return Err(CompileError::AssignToConstant {
                    name: name.to_string(),
                    pos: name_expr.pos,
                });
            }
            same_type(&existing.ty, &reg.ty, value)?;
            out.push_str(&store(&reg.ty, &reg.name, &existing.storage));
            if constant {
                ctx.scopes
                    .define(name, Binding::constant(existing.storage, reg.ty))
                    .map_err(|err| CompileError::from_scope(err, name_expr.pos))?;
            }
            return Ok(out);
        }
    }

    let storage = ctx.allocate_slot(name, &reg.ty);
    out.push_str(&store(&reg.ty, &reg.name, &storage));
    let binding = if constant {
        Binding::constant(storage, reg.ty)
    } else {
        Binding::variable(storage, reg.ty)
    };
    ctx.scopes
        .define(name, binding)
        .map_err(|err| CompileError::from_scope(err, name_expr.pos))?;
    Ok(out)
}

/// `(def name value)`
pub(super) fn def(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let args = expect_args(node, 2)?;
    bind(args[0], args[1], false, ctx)
}

/// `(const name value)`
pub(super) fn constant(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let args = expect_args(node, 2)?;
    bind(args[0], args[1], true, ctx)
}

/// `(set name value)`: stores into an existing variable.
pub(super) fn set(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let args = expect_args(node, 2)?;
    let name = symbol_name(args[0], "assignment target")?;
    let binding = ctx
        .scopes
        .lookup(name)
        .map_err(|err| CompileError::from_scope(err, args[0].pos))?
        .clone();
    if binding.kind != BindingKind::Variable {
        return Err(CompileError::NotAValue {
            name: name.to_string(),
            pos: args[0].pos,
        });
    }
    if binding.constant {
        return Err(CompileError::AssignToConstant {
            name: name.to_string(),
            pos: args[0].pos,
        });
    }

    let (mut out, reg) = ctx.emit_value(args[1])?;
    same_type(&binding.ty, &reg.ty, args[1])?;
    out.push_str(&store(&reg.ty, &reg.name, &binding.storage));
    Ok(out)
}

/// `(let ((name value) ...) body ...)`. Bindings are made in order inside the
/// new scope, so later values can see earlier names.
pub(super) fn let_(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let args = expect_at_least(node, 2)?;
    let bindings = args[0];
    if bindings.is_atom() {
        return Err(CompileError::invalid("let expects a list of bindings", bindings.pos));
    }

    ctx.scopes.enter_scope();
    let mut out = String::new();
    for pair in bindings {
        if pair.len() != 2 {
            return Err(CompileError::invalid(
                format!("let binding must be (name value), got {}", pair),
                pair.pos,
            ));
        }
        out.push_str(&bind(pair.nth(0)?, pair.nth(1)?, false, ctx)?);
    }
    out.push_str(&emit_sequence(&args[1..], ctx)?);
    ctx.scopes.exit_scope();
    Ok(out)
}
