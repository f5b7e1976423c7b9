//! Scopes, register versioning and code generation for Cinder.
//!
//! Compiles expression trees read by `cinder-ir` into typed, register-based
//! LLVM assembly text. One [`Compiler::compile`] call is one run: it owns a
//! fresh [`Context`] (scope stack, version counters, declaration buffer)
//! and either returns a complete unit or an error with no output.
//!
//! ```
//! use cinder_core::{Compiler, Config};
//!
//! let mut compiler = Compiler::new(Config::default());
//! let ir = compiler.compile_str("(+ 1 2)").unwrap();
//! assert!(ir.contains("define i64 @entry()"));
//! ```

pub mod codegen;
mod compile;
mod config;
mod context;
mod error;
pub mod functions;
pub mod operator;
mod ops;
pub mod scope;
pub mod types;
pub mod version;

pub use compile::Compiler;
pub use config::{Config, ConfigError};
pub use context::Context;
pub use error::CompileError;
pub use functions::{FunctionRegistry, FunctionSig};
pub use operator::{Operator, OperatorTable};
pub use ops::{builtins, toplevel};
pub use scope::{Binding, BindingKind, RedefinePolicy, ScopeError, ScopeStack};
pub use version::{Register, VersionCounter, Versions};
