//! Type names accepted in source.

use cinder_ir::Expr;

use crate::CompileError;

const PRIMITIVES: &[&str] = &["i1", "i8", "i16", "i32", "i64", "float", "double"];

/// Resolve a source type name to its instruction-level spelling.
pub fn resolve_type(expr: &Expr) -> Result<String, CompileError> {
    let name = expr.as_atom().ok_or_else(|| CompileError::UnknownType {
        name: expr.to_string(),
        pos: expr.pos,
    })?;
    resolve_name(name).ok_or_else(|| CompileError::UnknownType {
        name: name.to_string(),
        pos: expr.pos,
    })
}

fn resolve_name(name: &str) -> Option<String> {
    if let Some(pointee) = name.strip_suffix('*') {
        return resolve_name(pointee).map(|t| format!("{}*", t));
    }
    let resolved = match name {
        "bool" => "i1",
        "char" => "i8",
        "int" => "i64",
        "real" => "double",
        "str" => "i8*",
        other if PRIMITIVES.contains(&other) => other,
        _ => return None,
    };
    Some(resolved.to_string())
}

pub fn is_integer(ty: &str) -> bool {
    matches!(ty, "i1" | "i8" | "i16" | "i32" | "i64")
}

pub fn is_float(ty: &str) -> bool {
    matches!(ty, "float" | "double")
}
