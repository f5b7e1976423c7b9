//! Expression tree to LLVM text code generation.
//!
//! Every evaluated form leaves exactly one typed result register behind,
//! retrievable through [`Context::current_result`]. Literals go through a
//! scratch slot; symbols load from their binding's storage; lists dispatch
//! to a builtin operator or become a call.

mod atom;
mod call;

use cinder_ir::{Expr, ExprKind};
use tracing::trace;

use crate::{CompileError, Context};

/// Compile one node to newline-terminated instruction text.
pub fn emit_code(node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
    let mut out = match &node.kind {
        ExprKind::Nil => return Err(CompileError::UnsupportedForm { pos: node.pos }),
        ExprKind::Atom(lexeme) => atom::emit_atom(lexeme, node.pos, ctx)?,
        ExprKind::Cons(..) => {
            let name = call_target(node)?;
            match ctx.builtin(name) {
                Some(op) => {
                    trace!(op = name, pos = %node.pos, "builtin");
                    op.compile(node, ctx)?
                }
                None => call::emit_call(name, node, ctx)?,
            }
        }
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// The operator name in head position of a list.
pub fn call_target(node: &Expr) -> Result<&str, CompileError> {
    match node.head() {
        Some(head) => head
            .as_atom()
            .ok_or(CompileError::InvalidCallTarget { pos: head.pos }),
        None => Err(CompileError::UnsupportedForm { pos: node.pos }),
    }
}

pub fn alloca(address: &str, ty: &str) -> String {
    format!("{} = alloca {}\n", address, ty)
}

pub fn store(ty: &str, value: &str, address: &str) -> String {
    format!("store {} {}, {}* {}\n", ty, value, ty, address)
}

pub fn load(to: &str, ty: &str, source: &str) -> String {
    format!("{} = load {}, {}* {}\n", to, ty, ty, source)
}

fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '$' | '.' | '_');
    match chars.next() {
        Some(c) if valid(c) && !c.is_ascii_digit() => chars.all(valid),
        _ => false,
    }
}

fn sigiled(sigil: char, name: &str) -> String {
    if is_bare_identifier(name) {
        format!("{}{}", sigil, name)
    } else {
        format!("{}\"{}\"", sigil, escape_bytes(name.as_bytes()))
    }
}

/// Local name for raw text, quoted when it is not a bare identifier.
pub fn local_name(raw: &str) -> String {
    sigiled('%', raw)
}

/// Storage name of a variable: its name suffixed with `.` and the defining
/// depth. Generated names never end in `.<digits>`, so the two cannot meet.
pub fn decorate_local(name: &str, depth: usize) -> String {
    local_name(&format!("{}.{}", name, depth))
}

/// Global name of a function.
pub fn decorate_global(name: &str) -> String {
    sigiled('@', name)
}

/// Escape bytes for a `c"..."` constant or quoted name.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (0x20..0x7f).contains(&b) && b != b'"' && b != b'\\' {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\{:02X}", b));
        }
    }
    out
}
