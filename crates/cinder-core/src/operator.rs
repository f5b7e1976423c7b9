//! Name-keyed operator tables.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use cinder_ir::Expr;

use crate::{CompileError, Context};

/// Compiles one form whose head names this operator.
///
/// Handlers receive the whole node, head included, and decide themselves
/// which operands to compile through [`Context::emit`].
pub trait Operator {
    fn compile(&self, node: &Expr, ctx: &mut Context) -> Result<String, CompileError>;
}

impl<F> Operator for F
where
    F: Fn(&Expr, &mut Context) -> Result<String, CompileError>,
{
    fn compile(&self, node: &Expr, ctx: &mut Context) -> Result<String, CompileError> {
        self(node, ctx)
    }
}

/// Mapping from operator name to handler.
#[derive(Clone, Default)]
pub struct OperatorTable {
    ops: HashMap<String, Rc<dyn Operator>>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `op` under `name`, replacing any previous handler.
    pub fn register(&mut self, name: impl Into<String>, op: impl Operator + 'static) {
        self.ops.insert(name.into(), Rc::new(op));
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Operator>> {
        self.ops.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.ops.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for OperatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
