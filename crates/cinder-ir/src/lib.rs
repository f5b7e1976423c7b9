//! Expression trees and the reader for Cinder.
//!
//! Source text is read into homogeneous cons-chain trees ([`Expr`]); the
//! code generator in `cinder-core` consumes them.

pub mod atom;
mod expr;
mod reader;

pub use atom::{AtomKind, atomize, classify};
pub use expr::{Expr, ExprKind, IndexError, Iter, Position};
pub use reader::{ReadError, Reader, Token, read_all, read_str};

/// Renders an expression back to canonical source text.
pub fn print(expr: &Expr) -> String {
    expr.to_string()
}

#[cfg(test)]
mod tests;
