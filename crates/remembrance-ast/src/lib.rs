//! tree-sitter based structural checks shared by the coherency scorer
//! (`correctness` dimension) and the safety gate's AST-aware principles.
//! No semantic type-checking is attempted — every check here is a
//! shallow, language-generic AST pattern match, not a compiler.

pub mod checks;
pub mod error;
pub mod parser;

pub use checks::{analyze, StructuralReport};
pub use error::{AstError, Result};
pub use parser::parse;
