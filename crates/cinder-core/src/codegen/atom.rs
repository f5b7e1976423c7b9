//! Literal and symbol atoms.

use cinder_ir::atom::{literal_content, unescape};
use cinder_ir::{AtomKind, Position, atomize, classify};

use super::{alloca, escape_bytes, load, store};
use crate::scope::BindingKind;
use crate::{CompileError, Context};

pub(super) fn emit_atom(lexeme: &str, pos: Position, ctx: &mut Context) -> Result<String, CompileError> {
    atomize(lexeme, pos)?;
    match classify(lexeme) {
        AtomKind::True => Ok(scalar(ctx, "i1", "1")),
        AtomKind::False => Ok(scalar(ctx, "i1", "0")),
        AtomKind::Integer => {
            let value: i64 = lexeme
                .parse()
                .map_err(|_| CompileError::invalid(format!("integer literal {} out of range", lexeme), pos))?;
            Ok(scalar(ctx, "i64", &value.to_string()))
        }
        AtomKind::Real => {
            let value: f64 = lexeme
                .parse()
                .map_err(|_| CompileError::invalid(format!("invalid real literal {}", lexeme), pos))?;
            // Hex spelling is exact for every double
            Ok(scalar(ctx, "double", &format!("0x{:016X}", value.to_bits())))
        }
        AtomKind::Character => Ok(character(ctx, lexeme)),
        AtomKind::String => Ok(string(ctx, lexeme)),
        AtomKind::Symbol => symbol(ctx, lexeme, pos),
    }
}

/// Scratch slot, store, load into a fresh result register.
fn scalar(ctx: &mut Context, ty: &str, value: &str) -> String {
    let tmp = ctx.versions.unique_tmp();
    let mut out = alloca(&tmp, ty);
    out.push_str(&store(ty, value, &tmp));
    let res = ctx.versions.unique_res(ty);
    out.push_str(&load(&res, ty, &tmp));
    out
}

fn character(ctx: &mut Context, lexeme: &str) -> String {
    let bytes = unescape(literal_content(lexeme));
    let global = ctx.versions.unique_global();
    ctx.hoist(format!(
        "{} = private unnamed_addr constant [2 x i8] c\"{}\\00\"",
        global,
        escape_bytes(&bytes)
    ));

    let slot = ctx.versions.unique_tmp();
    let mut out = alloca(&slot, "i8");
    let value = ctx.versions.unique_tmp();
    out.push_str(&format!(
        "{} = load i8, i8* getelementptr inbounds ([2 x i8], [2 x i8]* {}, i64 0, i64 0)\n",
        value, global
    ));
    out.push_str(&store("i8", &value, &slot));
    let res = ctx.versions.unique_res("i8");
    out.push_str(&load(&res, "i8", &slot));
    out
}

fn string(ctx: &mut Context, lexeme: &str) -> String {
    let mut bytes = unescape(literal_content(lexeme));
    bytes.extend_from_slice(b"\n\0");
    let array = format!("[{} x i8]", bytes.len());
    let global = ctx.versions.unique_global();
    ctx.hoist(format!(
        "{} = private unnamed_addr constant {} c\"{}\"",
        global,
        array,
        escape_bytes(&bytes)
    ));

    let res = ctx.versions.unique_res("i8*");
    format!(
        "{} = getelementptr inbounds {}, {}* {}, i64 0, i64 0\n",
        res, array, array, global
    )
}

fn symbol(ctx: &mut Context, name: &str, pos: Position) -> Result<String, CompileError> {
    let binding = ctx
        .scopes
        .lookup(name)
        .map_err(|err| CompileError::from_scope(err, pos))?
        .clone();
    if binding.kind != BindingKind::Variable {
        return Err(CompileError::NotAValue {
            name: name.to_string(),
            pos,
        });
    }
    let res = ctx.versions.unique_res(&binding.ty);
    Ok(load(&res, &binding.ty, &binding.storage))
}
