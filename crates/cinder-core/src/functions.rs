//! Callee registration store.

use std::collections::HashMap;

/// Signature of a callable function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    /// Decorated global name, e.g. `@add`.
    pub symbol: String,
    pub ret: String,
    pub params: Vec<String>,
    pub variadic: bool,
}

impl FunctionSig {
    /// Parameter list as written in `define`/`declare` headers and
    /// variadic call sites.
    pub fn param_list(&self) -> String {
        let mut params = self.params.clone();
        if self.variadic {
            params.push("...".to_string());
        }
        params.join(", ")
    }

    /// The callee type as needed by a call instruction. Variadic callees
    /// must spell out their full function type.
    pub fn call_type(&self) -> String {
        if self.variadic {
            format!("{} ({})", self.ret, self.param_list())
        } else {
            self.ret.clone()
        }
    }

    /// The `declare` line for this callee.
    pub fn declaration(&self) -> String {
        format!("declare {} {}({})", self.ret, self.symbol, self.param_list())
    }
}

/// Functions known to the compiler, keyed by logical name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    sigs: HashMap<String, FunctionSig>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSig> {
        self.sigs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sigs.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, sig: FunctionSig) {
        self.sigs.insert(name.into(), sig);
    }
}
