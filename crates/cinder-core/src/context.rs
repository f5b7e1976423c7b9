//! Per-run compilation state.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use cinder_ir::{Expr, Position};

use crate::codegen::{alloca, decorate_global, decorate_local, emit_code, local_name};
use crate::functions::{FunctionRegistry, FunctionSig};
use crate::operator::{Operator, OperatorTable};
use crate::scope::{Binding, RedefinePolicy, ScopeStack};
use crate::version::{Register, Versions};
use crate::{CompileError, Config};

/// Variable slots of the routine being generated. Their allocas are emitted
/// at the top of the routine so they dominate every use.
#[derive(Debug, Default)]
struct Routine {
    slots: HashMap<String, String>,
    prologue: String,
}

/// Everything one compilation run reads and writes.
///
/// A fresh context starts with one empty top-level scope, all counters at
/// zero and an empty declaration buffer, so dropping it is the reset.
pub struct Context {
    pub scopes: ScopeStack,
    pub versions: Versions,
    hoisted: Vec<String>,
    routine: Routine,
    outer_routines: Vec<Routine>,
    functions: FunctionRegistry,
    /// Callees defined or declared in this run's output.
    visible: HashSet<String>,
    builtins: Rc<OperatorTable>,
    allow_redefine_functions: bool,
    entry: String,
}

impl Context {
    pub fn new(config: &Config, builtins: Rc<OperatorTable>, functions: FunctionRegistry) -> Self {
        Context {
            scopes: ScopeStack::new(RedefinePolicy::from(config)),
            versions: Versions::new(),
            hoisted: Vec::new(),
            routine: Routine::default(),
            outer_routines: Vec::new(),
            functions,
            visible: HashSet::new(),
            builtins,
            allow_redefine_functions: config.allow_redefine_functions,
            entry: config.entry.clone(),
        }
    }

    /// Compiles a sub-form.
    pub fn emit(&mut self, node: &Expr) -> Result<String, CompileError> {
        emit_code(node, self)
    }

    /// Compiles a sub-form and returns its code with the register holding
    /// its value.
    pub fn emit_value(&mut self, node: &Expr) -> Result<(String, Register), CompileError> {
        let code = self.emit(node)?;
        let reg = self.current_result()?;
        Ok((code, reg))
    }

    /// The most recent result register of this run.
    pub fn current_result(&self) -> Result<Register, CompileError> {
        self.versions.current_res().ok_or(CompileError::EmptyResult)
    }

    pub fn builtin(&self, name: &str) -> Option<Rc<dyn Operator>> {
        self.builtins.get(name)
    }

    /// Queues a declaration for the program preamble.
    pub fn hoist(&mut self, decl: impl Into<String>) {
        self.hoisted.push(decl.into());
    }

    pub fn hoisted(&self) -> &[String] {
        &self.hoisted
    }

    /// Drains the declaration buffer.
    pub fn take_hoisted(&mut self) -> Vec<String> {
        std::mem::take(&mut self.hoisted)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    /// Starts generating a nested routine with its own variable slots.
    pub fn enter_routine(&mut self) {
        let outer = std::mem::take(&mut self.routine);
        self.outer_routines.push(outer);
    }

    /// Finishes the current routine and returns the allocas for its top.
    pub fn exit_routine(&mut self) -> String {
        let outer = self.outer_routines.pop().unwrap_or_default();
        std::mem::replace(&mut self.routine, outer).prologue
    }

    /// Storage for variable `name` at the current depth.
    ///
    /// A slot left behind by a sibling scope is reused when the type agrees;
    /// otherwise a fresh suffixed slot is allocated.
    pub fn allocate_slot(&mut self, name: &str, ty: &str) -> String {
        let depth = self.scopes.depth();
        let mut storage = decorate_local(name, depth);
        let mut attempt = 0;
        while let Some(existing) = self.routine.slots.get(&storage) {
            if existing == ty {
                return storage;
            }
            attempt += 1;
            storage = local_name(&format!("{}.{}.v{}", name, depth, attempt));
        }
        self.routine.prologue.push_str(&alloca(&storage, ty));
        self.routine.slots.insert(storage.clone(), ty.to_string());
        storage
    }

    /// Hoists a `declare` for a callee registered by an earlier run, once.
    pub fn ensure_declared(&mut self, name: &str, sig: &FunctionSig) {
        if self.visible.insert(name.to_string()) {
            self.hoist(sig.declaration());
        }
    }

    /// Registers a callee, binding its name in the current scope.
    pub fn define_function(
        &mut self,
        name: &str,
        sig: FunctionSig,
        pos: Position,
    ) -> Result<(), CompileError> {
        if sig.symbol == decorate_global(&self.entry) || is_generated_global(name) {
            return Err(CompileError::invalid(
                format!("'{}' is reserved for generated code", name),
                pos,
            ));
        }
        // Functions from earlier runs are not in this run's scopes.
        if self.functions.contains(name) && !self.allow_redefine_functions {
            return Err(CompileError::Redefinition {
                name: name.to_string(),
                kind: "function",
                pos,
            });
        }
        self.scopes
            .define(name, Binding::function(sig.symbol.clone(), sig.ret.clone()))
            .map_err(|err| CompileError::from_scope(err, pos))?;
        self.functions.insert(name, sig);
        self.visible.insert(name.to_string());
        Ok(())
    }

    pub fn into_functions(self) -> FunctionRegistry {
        self.functions
    }
}

/// Names of the form `str.version<N>` belong to hoisted constants.
fn is_generated_global(name: &str) -> bool {
    name.strip_prefix("str.version")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}
