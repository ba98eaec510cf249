//! Shared types for the Vectra expression engine.
//!
//! This crate defines source spans, structured script errors, the AST
//! produced by the parser, runtime values, and the scene object model
//! shared by every stage of an evaluation pass.

mod error;
mod span;
mod value;
pub mod ast;
pub mod scene;

pub use error::{ErrorCategory, ErrorCode, ScriptError};
pub use span::{ScriptSource, Span};
pub use value::{MatrixValue, ShapeError, Value};

/// Result type used by the lexer and parser.
pub type Result<T> = std::result::Result<T, ScriptError>;
