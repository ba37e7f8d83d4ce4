//! Runners for interpreted languages: stage a single source file and hand
//! it straight to the interpreter.

use std::fs;
use std::path::Path;

use remembrance_domain::value_objects::Language;
use remembrance_domain::{Error, Result};
use tokio::process::Command;

use crate::runner::LanguageRunner;

fn stage(dir: &Path, file_name: &str, code: &str, test_code: &str) -> Result<std::path::PathBuf> {
    let path = dir.join(file_name);
    let combined = format!("{code}\n\n{test_code}\n");
    fs::write(&path, combined).map_err(|e| Error::IoFailure {
        path: path.display().to_string(),
        kind: e.kind().to_string(),
    })?;
    Ok(path)
}

/// Runs `python3` directly against the combined source and test code.
pub struct PythonRunner;

impl LanguageRunner for PythonRunner {
    fn language(&self) -> Language {
        Language::Python
    }

    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command> {
        let path = stage(dir, "candidate.py", code, test_code)?;
        let mut command = Command::new("python3");
        command.arg(path).current_dir(dir);
        Ok(command)
    }
}

/// Runs `node` directly against the combined source and test code.
pub struct JavaScriptRunner;

impl LanguageRunner for JavaScriptRunner {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command> {
        let path = stage(dir, "candidate.js", code, test_code)?;
        let mut command = Command::new("node");
        command.arg(path).current_dir(dir);
        Ok(command)
    }
}

/// Runs `npx tsx`, which type-strips and executes TypeScript without a
/// separate build step.
pub struct TypeScriptRunner;

impl LanguageRunner for TypeScriptRunner {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command> {
        let path = stage(dir, "candidate.ts", code, test_code)?;
        let mut command = Command::new("npx");
        command.args(["--yes", "tsx"]).arg(path).current_dir(dir);
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn python_runner_writes_combined_source() {
        let dir = tempdir().expect("tempdir");
        let runner = PythonRunner;
        let command = runner.prepare(dir.path(), "def add(a, b): return a + b", "assert add(1, 2) == 3").unwrap();
        assert_eq!(command.as_std().get_program().to_str(), Some("python3"));
        let contents = fs::read_to_string(dir.path().join("candidate.py")).unwrap();
        assert!(contents.contains("def add"));
        assert!(contents.contains("assert add"));
    }

    #[test]
    fn typescript_runner_uses_tsx() {
        let dir = tempdir().expect("tempdir");
        let runner = TypeScriptRunner;
        let command = runner.prepare(dir.path(), "export const x = 1;", "console.assert(x === 1);").unwrap();
        assert_eq!(command.as_std().get_program().to_str(), Some("npx"));
    }
}
