//! Standard operator library.
//!
//! Builtins compile inline wherever they appear; top-level operators are
//! only recognised as the outermost form of a run and produce declarations.

mod bind;
mod bool;
mod math;
mod std;
mod top;

use cinder_ir::Expr;

use crate::codegen::call_target;
use crate::operator::OperatorTable;
use crate::{CompileError, Context};

/// The builtin operator table.
pub fn builtins() -> OperatorTable {
    let mut table = OperatorTable::new();

    table.register("+", math::arith("add", "fadd"));
    table.register("-", math::arith("sub", "fsub"));
    table.register("*", math::arith("mul", "fmul"));
    table.register("/", math::arith("sdiv", "fdiv"));

    table.register("=", math::compare("eq", "oeq"));
    table.register("!=", math::compare("ne", "one"));
    table.register("<", math::compare("slt", "olt"));
    table.register("<=", math::compare("sle", "ole"));
    table.register(">", math::compare("sgt", "ogt"));
    table.register(">=", math::compare("sge", "oge"));

    table.register("and", bool::logic("and"));
    table.register("or", bool::logic("or"));
    table.register("not", bool::not);

    table.register("if", std::if_);
    table.register("begin", std::begin);

    table.register("def", bind::def);
    table.register("const", bind::constant);
    table.register("set", bind::set);
    table.register("let", bind::let_);

    table
}

/// The top-level operator table.
pub fn toplevel() -> OperatorTable {
    let mut table = OperatorTable::new();
    table.register("function", top::function);
    table.register("declare", top::declare);
    table
}

/// Operands after the head, checked against an exact count.
fn expect_args(node: &Expr, count: usize) -> Result<Vec<&Expr>, CompileError> {
    let args = node.args();
    if args.len() != count {
        return Err(CompileError::InvalidArgCount {
            opcode: call_target(node)?.to_string(),
            expected: count,
            got: args.len(),
            pos: node.pos,
        });
    }
    Ok(args)
}

/// Operands after the head, at least `count` of them.
fn expect_at_least(node: &Expr, count: usize) -> Result<Vec<&Expr>, CompileError> {
    let args = node.args();
    if args.len() < count {
        return Err(CompileError::InvalidArgCount {
            opcode: call_target(node)?.to_string(),
            expected: count,
            got: args.len(),
            pos: node.pos,
        });
    }
    Ok(args)
}

/// A symbol in binding position.
fn symbol_name<'a>(expr: &'a Expr, what: &str) -> Result<&'a str, CompileError> {
    match expr.as_atom() {
        Some(name) if cinder_ir::classify(name) == cinder_ir::AtomKind::Symbol => Ok(name),
        _ => Err(CompileError::invalid(
            format!("{} must be a symbol, got {}", what, expr),
            expr.pos,
        )),
    }
}

fn same_type(expected: &str, found: &str, expr: &Expr) -> Result<(), CompileError> {
    if expected == found {
        Ok(())
    } else {
        Err(CompileError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            pos: expr.pos,
        })
    }
}

/// Compiles forms in order; the last one's register is the result.
fn emit_sequence(forms: &[&Expr], ctx: &mut Context) -> Result<String, CompileError> {
    let mut out = String::new();
    for form in forms {
        out.push_str(&ctx.emit(form)?);
    }
    Ok(out)
}
