//! Errors raised during a compilation run.

use cinder_ir::{IndexError, Position, ReadError};
use thiserror::Error;

use crate::scope::ScopeError;

/// Every error is fatal to the run that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("syntax error: {0}")]
    Syntax(#[from] ReadError),

    #[error("symbol '{name}' is unbound at {pos}")]
    UnboundSymbol { name: String, pos: Position },

    #[error("lists can't be used as function names in calls at {pos}")]
    InvalidCallTarget { pos: Position },

    #[error("cannot redefine {kind} '{name}' at {pos}")]
    Redefinition {
        name: String,
        kind: &'static str,
        pos: Position,
    },

    #[error("can't emit code for the empty form at {pos}")]
    UnsupportedForm { pos: Position },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("invalid argument count for {opcode}: expected {expected}, got {got} at {pos}")]
    InvalidArgCount {
        opcode: String,
        expected: usize,
        got: usize,
        pos: Position,
    },

    #[error("invalid argument at {pos}: {message}")]
    InvalidArgument { message: String, pos: Position },

    #[error("type mismatch at {pos}: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: String,
        pos: Position,
    },

    #[error("cannot assign to constant '{name}' at {pos}")]
    AssignToConstant { name: String, pos: Position },

    #[error("'{name}' does not name a value at {pos}")]
    NotAValue { name: String, pos: Position },

    #[error("unknown type '{name}' at {pos}")]
    UnknownType { name: String, pos: Position },

    #[error("no result register was produced")]
    EmptyResult,
}

impl CompileError {
    /// Attach a source position to a scope error.
    pub fn from_scope(err: ScopeError, pos: Position) -> Self {
        match err {
            ScopeError::Unbound(name) => CompileError::UnboundSymbol { name, pos },
            ScopeError::Redefinition { name, kind } => CompileError::Redefinition { name, kind, pos },
        }
    }

    pub(crate) fn invalid(message: impl Into<String>, pos: Position) -> Self {
        CompileError::InvalidArgument {
            message: message.into(),
            pos,
        }
    }

    /// The source position of the error, when one was recorded.
    pub fn pos(&self) -> Option<Position> {
        match self {
            CompileError::Syntax(err) => Some(err.pos()),
            CompileError::Index(err) => Some(err.pos),
            CompileError::UnboundSymbol { pos, .. }
            | CompileError::InvalidCallTarget { pos }
            | CompileError::Redefinition { pos, .. }
            | CompileError::UnsupportedForm { pos }
            | CompileError::InvalidArgCount { pos, .. }
            | CompileError::InvalidArgument { pos, .. }
            | CompileError::TypeMismatch { pos, .. }
            | CompileError::AssignToConstant { pos, .. }
            | CompileError::NotAValue { pos, .. }
            | CompileError::UnknownType { pos, .. } => Some(*pos),
            CompileError::EmptyResult => None,
        }
    }
}
