//! Per-language capability metadata built on top of
//! [`remembrance_domain::value_objects::Language`]: file extensions,
//! comment syntax, and which downstream capabilities (sandbox runner,
//! AST checks) a language actually has.

use std::collections::HashMap;

use remembrance_domain::value_objects::Language;

/// Static metadata describing what the rest of the system can do with a
/// given language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    /// The language this info describes.
    pub language: Language,
    /// Common file extensions, most canonical first.
    pub extensions: &'static [&'static str],
    /// Single-line comment prefix, if the language has one.
    pub comment_prefix: Option<&'static str>,
    /// Block comment delimiters `(start, end)`, if the language has them.
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Whether `remembrance-sandbox` ships a runner for this language.
    pub has_sandbox_runner: bool,
    /// Whether `remembrance-ast` has a tree-sitter grammar registered.
    pub has_ast_support: bool,
}

const INFOS: &[LanguageInfo] = &[
    LanguageInfo {
        language: Language::Rust,
        extensions: &["rs"],
        comment_prefix: Some("//"),
        block_comment: Some(("/*", "*/")),
        has_sandbox_runner: true,
        has_ast_support: true,
    },
    LanguageInfo {
        language: Language::Python,
        extensions: &["py", "pyi", "pyw"],
        comment_prefix: Some("#"),
        block_comment: None,
        has_sandbox_runner: true,
        has_ast_support: true,
    },
    LanguageInfo {
        language: Language::JavaScript,
        extensions: &["js", "mjs", "cjs", "jsx"],
        comment_prefix: Some("//"),
        block_comment: Some(("/*", "*/")),
        has_sandbox_runner: true,
        has_ast_support: true,
    },
    LanguageInfo {
        language: Language::TypeScript,
        extensions: &["ts", "mts", "cts", "tsx"],
        comment_prefix: Some("//"),
        block_comment: Some(("/*", "*/")),
        has_sandbox_runner: true,
        has_ast_support: true,
    },
    LanguageInfo {
        language: Language::Go,
        extensions: &["go"],
        comment_prefix: Some("//"),
        block_comment: Some(("/*", "*/")),
        has_sandbox_runner: true,
        has_ast_support: true,
    },
    LanguageInfo {
        language: Language::Java,
        extensions: &["java"],
        comment_prefix: Some("//"),
        block_comment: Some(("/*", "*/")),
        has_sandbox_runner: true,
        has_ast_support: true,
    },
    LanguageInfo {
        language: Language::C,
        extensions: &["c", "h"],
        comment_prefix: Some("//"),
        block_comment: Some(("/*", "*/")),
        has_sandbox_runner: true,
        has_ast_support: true,
    },
    LanguageInfo {
        language: Language::Cpp,
        extensions: &["cpp", "cc", "cxx", "hpp", "hxx"],
        comment_prefix: Some("//"),
        block_comment: Some(("/*", "*/")),
        has_sandbox_runner: true,
        has_ast_support: true,
    },
];

/// Extension → language lookup and metadata cache, built once and
/// reused by callers that detect language from a submitted file name.
pub struct LanguageRegistry {
    by_extension: HashMap<&'static str, Language>,
}

impl LanguageRegistry {
    /// Build a registry covering every language in the closed set.
    #[must_use]
    pub fn new() -> Self {
        let mut by_extension = HashMap::new();
        for info in INFOS {
            for ext in info.extensions {
                by_extension.insert(*ext, info.language);
            }
        }
        Self { by_extension }
    }

    /// Look up metadata for a language.
    #[must_use]
    pub fn info(&self, language: Language) -> &'static LanguageInfo {
        INFOS
            .iter()
            .find(|i| i.language == language)
            .unwrap_or_else(|| unreachable!("every Language variant has a registered LanguageInfo"))
    }

    /// Detect language from a file extension (without the leading dot).
    #[must_use]
    pub fn by_extension(&self, ext: &str) -> Option<Language> {
        let cleaned = ext.trim_start_matches('.').to_lowercase();
        self.by_extension.get(cleaned.as_str()).copied()
    }

    /// Every language with an active sandbox runner.
    #[must_use]
    pub fn sandboxed_languages(&self) -> Vec<Language> {
        INFOS
            .iter()
            .filter(|i| i.has_sandbox_runner)
            .map(|i| i.language)
            .collect()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_extension() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.by_extension("rs"), Some(Language::Rust));
        assert_eq!(registry.by_extension(".PY"), Some(Language::Python));
    }

    #[test]
    fn unknown_extension_is_none() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.by_extension("xyz"), None);
    }

    #[test]
    fn every_language_has_runner() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.sandboxed_languages().len(), 8);
    }

    #[test]
    fn python_has_no_block_comment() {
        let registry = LanguageRegistry::new();
        assert!(registry.info(Language::Python).block_comment.is_none());
    }
}
