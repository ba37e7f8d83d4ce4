//! Grammar selection and parsing.

use remembrance_domain::value_objects::Language;
use tree_sitter::{Parser, Tree};

use crate::error::{AstError, Result};

fn grammar(language: Language) -> tree_sitter::Language {
    match language {
        Language::Rust => tree_sitter_rust::LANGUAGE.into(),
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::Go => tree_sitter_go::LANGUAGE.into(),
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::C => tree_sitter_c::LANGUAGE.into(),
        Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
    }
}

/// Parse `source` with the grammar registered for `language`.
pub fn parse(source: &str, language: Language) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar(language))
        .map_err(|_| AstError::ParseFailed)?;
    parser.parse(source, None).ok_or(AstError::ParseFailed)
}
