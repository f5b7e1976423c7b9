//! The compile driver.

use std::rc::Rc;

use cinder_ir::{Expr, ExprKind, read_all, read_str};
use tracing::debug;

use crate::codegen::{call_target, decorate_global, emit_code};
use crate::functions::FunctionRegistry;
use crate::operator::OperatorTable;
use crate::{CompileError, Config, Context, ops};

/// Compiles one form per run into a self-contained unit of LLVM text.
///
/// Functions defined by a successful run stay registered, so later runs can
/// call them. A failed run leaves no trace.
#[derive(Debug)]
pub struct Compiler {
    config: Config,
    builtins: Rc<OperatorTable>,
    toplevel: Rc<OperatorTable>,
    functions: FunctionRegistry,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new(Config::default())
    }
}

impl Compiler {
    /// A compiler with the standard operator library.
    pub fn new(config: Config) -> Self {
        Compiler::with_tables(config, ops::builtins(), ops::toplevel())
    }

    pub fn with_tables(config: Config, builtins: OperatorTable, toplevel: OperatorTable) -> Self {
        Compiler {
            config,
            builtins: Rc::new(builtins),
            toplevel: Rc::new(toplevel),
            functions: FunctionRegistry::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Runs code generation once on `form` and wraps the result in the entry
    /// routine, preceded by every hoisted declaration.
    pub fn compile(&mut self, form: &Expr) -> Result<String, CompileError> {
        debug!(pos = %form.pos, "compile run");
        let mut ctx = Context::new(&self.config, self.builtins.clone(), self.functions.clone());

        let body = self.emit_outermost(form, &mut ctx)?;
        let result = ctx.current_result()?;
        let prologue = ctx.exit_routine();

        let mut out = String::new();
        for decl in ctx.take_hoisted() {
            out.push_str(&decl);
            out.push('\n');
        }
        out.push_str(&format!(
            "define {} {}() {{\n{}{}ret {} {}\n}}\n",
            result.ty,
            decorate_global(&self.config.entry),
            prologue,
            body,
            result.ty,
            result.name
        ));

        self.functions = ctx.into_functions();
        debug!(result = %result.name, ty = %result.ty, "run finished");
        Ok(out)
    }

    /// Top-level operators are only looked up here. Their output is hoisted
    /// and the form itself evaluates to `true`.
    fn emit_outermost(&self, form: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
        if let ExprKind::Cons(..) = form.kind {
            let name = call_target(form)?;
            if let Some(op) = self.toplevel.get(name) {
                debug!(op = name, "top-level operator");
                let decl = op.compile(form, ctx)?;
                ctx.hoist(decl);
                return emit_code(&Expr::atom("true", form.pos), ctx);
            }
        }
        emit_code(form, ctx)
    }

    /// Reads the first form of `source` and compiles it.
    pub fn compile_str(&mut self, source: &str) -> Result<String, CompileError> {
        let form = read_str(source)?;
        self.compile(&form)
    }

    /// Compiles every top-level form of `source` as its own run.
    pub fn compile_program(&mut self, source: &str) -> Result<Vec<String>, CompileError> {
        read_all(source)?
            .iter()
            .map(|form| self.compile(form))
            .collect()
    }
}
