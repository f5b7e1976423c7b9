//! Calls to registered functions.

use cinder_ir::Expr;

use crate::{CompileError, Context};

pub(super) fn emit_call(name: &str, node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let sig = ctx
        .function(name)
        .cloned()
        .ok_or_else(|| CompileError::UnboundSymbol {
            name: name.to_string(),
            pos: node.pos,
        })?;

    let args = node.args();
    let arity_ok = if sig.variadic {
        args.len() >= sig.params.len()
    } else {
        args.len() == sig.params.len()
    };
    if !arity_ok {
        return Err(CompileError::InvalidArgCount {
            opcode: name.to_string(),
            expected: sig.params.len(),
            got: args.len(),
            pos: node.pos,
        });
    }

    ctx.ensure_declared(name, &sig);

    let mut out = String::new();
    let mut operands = Vec::with_capacity(args.len());
    for (idx, arg) in args.iter().enumerate() {
        let (code, reg) = ctx.emit_value(arg)?;
        out.push_str(&code);
        if let Some(expected) = sig.params.get(idx) {
            if *expected != reg.ty {
                return Err(CompileError::TypeMismatch {
                    expected: expected.clone(),
                    found: reg.ty,
                    pos: arg.pos,
                });
            }
        }
        operands.push(format!("{} {}", reg.ty, reg.name));
    }

    let res = ctx.versions.unique_res(&sig.ret);
    out.push_str(&format!(
        "{} = call {} {}({})\n",
        res,
        sig.call_type(),
        sig.symbol,
        operands.join(", ")
    ));
    Ok(out)
}
