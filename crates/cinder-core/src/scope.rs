//! Lexical scopes.

use std::collections::HashMap;

use thiserror::Error;
use tracing::trace;

use crate::Config;

/// What a name is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Variable,
    Function,
    Macro,
}

impl BindingKind {
    pub fn describe(self) -> &'static str {
        match self {
            BindingKind::Variable => "variable",
            BindingKind::Function => "function",
            BindingKind::Macro => "macro",
        }
    }
}

/// A logical name's entry in a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Decorated storage name used in emitted instructions.
    pub storage: String,
    /// Semantic type of the stored value.
    pub ty: String,
    pub kind: BindingKind,
    pub constant: bool,
    pub argument: bool,
}

impl Binding {
    pub fn variable(storage: impl Into<String>, ty: impl Into<String>) -> Self {
        Binding {
            storage: storage.into(),
            ty: ty.into(),
            kind: BindingKind::Variable,
            constant: false,
            argument: false,
        }
    }

    pub fn constant(storage: impl Into<String>, ty: impl Into<String>) -> Self {
        Binding {
            constant: true,
            ..Binding::variable(storage, ty)
        }
    }

    pub fn argument(storage: impl Into<String>, ty: impl Into<String>) -> Self {
        Binding {
            argument: true,
            ..Binding::variable(storage, ty)
        }
    }

    /// A function binding; `ty` is its return type.
    pub fn function(storage: impl Into<String>, ty: impl Into<String>) -> Self {
        Binding {
            kind: BindingKind::Function,
            constant: true,
            ..Binding::variable(storage, ty)
        }
    }

    /// A macro binding, for operators that introduce macro names. Its
    /// redefinition is governed by `allow_redefine_macros`.
    pub fn macro_expander(storage: impl Into<String>) -> Self {
        Binding {
            kind: BindingKind::Macro,
            constant: true,
            ..Binding::variable(storage, "")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("symbol '{0}' is unbound")]
    Unbound(String),

    #[error("cannot redefine {kind} '{name}'")]
    Redefinition { name: String, kind: &'static str },
}

/// One lexical level.
pub type Scope = HashMap<String, Binding>;

/// Which kinds of names may be bound a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedefinePolicy {
    pub macros: bool,
    pub functions: bool,
}

impl Default for RedefinePolicy {
    fn default() -> Self {
        RedefinePolicy::from(&Config::default())
    }
}

impl From<&Config> for RedefinePolicy {
    fn from(config: &Config) -> Self {
        RedefinePolicy {
            macros: config.allow_redefine_macros,
            functions: config.allow_redefine_functions,
        }
    }
}

/// Stack of scopes; index 0 is the top level.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    policy: RedefinePolicy,
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new(RedefinePolicy::default())
    }
}

impl ScopeStack {
    /// Creates a stack holding one empty top-level scope.
    pub fn new(policy: RedefinePolicy) -> Self {
        ScopeStack {
            scopes: vec![Scope::new()],
            policy,
        }
    }

    /// Current nesting depth; 0 at the top level.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
        trace!(depth = self.depth(), "enter scope");
    }

    /// Pops the innermost scope. The top-level scope is never popped.
    pub fn exit_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() == 1 {
            return None;
        }
        let scope = self.scopes.pop();
        trace!(depth = self.depth(), "exit scope");
        scope
    }

    /// Binds `name` in the innermost scope.
    pub fn define(&mut self, name: &str, binding: Binding) -> Result<(), ScopeError> {
        if let Ok(existing) = self.lookup(name) {
            let forbidden = match (existing.kind, binding.kind) {
                (BindingKind::Function, BindingKind::Function) => !self.policy.functions,
                (BindingKind::Macro, BindingKind::Macro) => !self.policy.macros,
                _ => false,
            };
            if forbidden {
                return Err(ScopeError::Redefinition {
                    name: name.to_string(),
                    kind: existing.kind.describe(),
                });
            }
        }

        let depth = self.depth();
        if let Some(scope) = self.scopes.last_mut() {
            trace!(name, depth, storage = %binding.storage, "define");
            scope.insert(name.to_string(), binding);
        }
        Ok(())
    }

    /// Resolves `name`, innermost scope first.
    pub fn lookup(&self, name: &str) -> Result<&Binding, ScopeError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| ScopeError::Unbound(name.to_string()))
    }

    /// Resolves `name` in the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&Binding> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }
}
