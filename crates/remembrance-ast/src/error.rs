//! Error type for structural AST checks.

use thiserror::Error;

/// Errors raised while parsing or analyzing source for structural checks.
#[derive(Error, Debug)]
pub enum AstError {
    /// tree-sitter failed to produce a tree at all (should not happen for
    /// any grammar we register; reserved for a future unsupported-grammar
    /// path).
    #[error("failed to parse source for structural analysis")]
    ParseFailed,
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, AstError>;
