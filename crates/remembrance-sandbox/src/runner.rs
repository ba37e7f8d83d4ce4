//! The per-language runner contract.

use std::path::Path;

use remembrance_domain::value_objects::Language;
use remembrance_domain::Result;
use tokio::process::Command;

/// Stages `code` and `test_code` inside `dir` and returns the command that
/// will build/run them. Implementations never execute the command
/// themselves; the sandbox owns the timeout, output cap, and cleanup.
pub trait LanguageRunner: Send + Sync {
    /// The language this runner knows how to execute.
    fn language(&self) -> Language;

    /// Write whatever source files this language needs into `dir` and
    /// return a ready-to-spawn command for running them.
    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command>;
}
