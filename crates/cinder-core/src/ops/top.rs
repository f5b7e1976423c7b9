//! Top-level definitions. Each returns a declaration for the preamble.

use cinder_ir::Expr;

use super::{emit_sequence, expect_args, expect_at_least, same_type, symbol_name};
use crate::codegen::{decorate_global, local_name, store};
use crate::functions::FunctionSig;
use crate::scope::Binding;
use crate::types::resolve_type;
use crate::{CompileError, Context};

/// `(function name ret ((arg type) ...) body ...)`
pub(super) fn function(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let args = expect_at_least(node, 4)?;
    let name = symbol_name(args[0], "function name")?;
    let ret = resolve_type(args[1])?;
    let param_list = args[2];
    if param_list.is_atom() {
        return Err(CompileError::invalid("function expects a parameter list", param_list.pos));
    }

    let mut params = Vec::new();
    for param in param_list {
        if param.len() != 2 {
            return Err(CompileError::invalid(
                format!("parameter must be (name type), got {}", param),
                param.pos,
            ));
        }
        let param_name = symbol_name(param.nth(0)?, "parameter name")?;
        let ty = resolve_type(param.nth(1)?)?;
        params.push((param_name, ty, param.pos));
    }

    let sig = FunctionSig {
        symbol: decorate_global(name),
        ret: ret.clone(),
        params: params.iter().map(|(_, ty, _)| ty.clone()).collect(),
        variadic: false,
    };
    // Registered before the body so it can recurse.
    ctx.define_function(name, sig.clone(), args[0].pos)?;

    ctx.enter_routine();
    ctx.scopes.enter_scope();
    let mut header = Vec::with_capacity(params.len());
    let mut body = String::new();
    for (param_name, ty, pos) in &params {
        let incoming = local_name(&format!("{}.arg", param_name));
        let storage = ctx.allocate_slot(param_name, ty);
        header.push(format!("{} {}", ty, incoming));
        body.push_str(&store(ty, &incoming, &storage));
        ctx.scopes
            .define(param_name, Binding::argument(storage, ty.clone()))
            .map_err(|err| CompileError::from_scope(err, *pos))?;
    }

    body.push_str(&emit_sequence(&args[3..], ctx)?);
    let result = ctx.current_result()?;
    let last = args[args.len() - 1];
    same_type(&ret, &result.ty, last)?;
    ctx.scopes.exit_scope();
    let prologue = ctx.exit_routine();

    Ok(format!(
        "define {} {}({}) {{\n{}{}ret {} {}\n}}",
        ret,
        sig.symbol,
        header.join(", "),
        prologue,
        body,
        ret,
        result.name
    ))
}

/// `(declare name ret (type ... [...]))`: an externally defined callee.
pub(super) fn declare(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let args = expect_args(node, 3)?;
    let name = symbol_name(args[0], "function name")?;
    let ret = resolve_type(args[1])?;
    if args[2].is_atom() {
        return Err(CompileError::invalid("declare expects a parameter type list", args[2].pos));
    }

    let mut params = Vec::new();
    let mut variadic = false;
    for ty in args[2] {
        if variadic {
            return Err(CompileError::invalid("'...' must be the last parameter", ty.pos));
        }
        if ty.as_atom() == Some("...") {
            variadic = true;
        } else {
            params.push(resolve_type(ty)?);
        }
    }

    let sig = FunctionSig {
        symbol: decorate_global(name),
        ret,
        params,
        variadic,
    };
    let decl = sig.declaration();
    ctx.define_function(name, sig, args[0].pos)?;
    Ok(decl)
}
