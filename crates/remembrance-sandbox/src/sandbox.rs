//! The registry that dispatches a language to its runner and enforces the
//! timeout/output/cleanup contract uniformly across all of them.

use std::collections::HashMap;

use remembrance_domain::value_objects::Language;
use remembrance_domain::{Error, Result};
use tempfile::tempdir;

use crate::exec::run_with_timeout;
use crate::options::SandboxOptions;
use crate::result::SandboxResult;
use crate::runner::LanguageRunner;
use crate::runners::{CRunner, CppRunner, GoRunner, JavaRunner, JavaScriptRunner, PythonRunner, RustRunner, TypeScriptRunner};

/// Executes `testCode` against `code` for a registered language. Holds no
/// state across invocations: every call gets a fresh temporary directory
/// that is removed when the call returns.
pub struct Sandbox {
    runners: HashMap<Language, Box<dyn LanguageRunner>>,
}

impl Sandbox {
    /// An empty registry with no runners.
    #[must_use]
    pub fn new() -> Self {
        Self { runners: HashMap::new() }
    }

    /// A registry pre-populated with the built-in runner for every
    /// language in the closed set.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut sandbox = Self::new();
        sandbox.register(Box::new(RustRunner));
        sandbox.register(Box::new(PythonRunner));
        sandbox.register(Box::new(JavaScriptRunner));
        sandbox.register(Box::new(TypeScriptRunner));
        sandbox.register(Box::new(GoRunner));
        sandbox.register(Box::new(JavaRunner));
        sandbox.register(Box::new(CRunner));
        sandbox.register(Box::new(CppRunner));
        sandbox
    }

    /// Registers (or replaces) the runner for its declared language.
    pub fn register(&mut self, runner: Box<dyn LanguageRunner>) {
        self.runners.insert(runner.language(), runner);
    }

    /// Runs `test_code` against `code` under `options`, or fails with
    /// [`Error::NoRunner`] if `language` has no registered runner.
    pub async fn execute(&self, code: &str, test_code: &str, language: Language, options: SandboxOptions) -> Result<SandboxResult> {
        let runner = self.runners.get(&language).ok_or_else(|| Error::NoRunner {
            language: language.to_string(),
        })?;

        let dir = tempdir().map_err(|e| Error::IoFailure {
            path: "<sandbox tempdir>".to_owned(),
            kind: e.kind().to_string(),
        })?;

        let command = runner.prepare(dir.path(), code, test_code)?;
        run_with_timeout(command, options).await
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unregistered_language_fails_with_no_runner() {
        let sandbox = Sandbox::new();
        let err = sandbox
            .execute("x", "y", Language::Rust, SandboxOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoRunner { .. }));
    }

    #[test]
    fn defaults_cover_every_closed_set_language() {
        let sandbox = Sandbox::with_defaults();
        assert_eq!(sandbox.runners.len(), 8);
    }
}
