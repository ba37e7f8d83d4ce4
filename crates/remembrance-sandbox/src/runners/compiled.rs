//! Runners for languages that compile to a binary before execution:
//! stage source, invoke the toolchain, run the resulting binary, all
//! inside the per-invocation temp directory.

use std::fs;
use std::path::Path;

use remembrance_domain::value_objects::Language;
use remembrance_domain::{Error, Result};
use tokio::process::Command;

use crate::runner::LanguageRunner;

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::IoFailure {
        path: path.display().to_string(),
        kind: e.kind().to_string(),
    })
}

fn chained(dir: &Path, compile: &str, compile_args: &[&str], binary: &Path) -> Command {
    // `sh -c` chains compile-then-run so the runner produces exactly one
    // command, matching `LanguageRunner::prepare`'s one-command contract.
    let compile_line = format!("{compile} {} && {}", compile_args.join(" "), binary.display());
    let mut command = Command::new("sh");
    command.args(["-c", &compile_line]).current_dir(dir);
    command
}

/// Compiles the combined source with `rustc` and runs the resulting
/// binary. `test_code` is expected to call into `code` and panic (or
/// exit non-zero) on failure, mirroring how `#[test]` functions behave
/// without needing the full `cargo test` harness.
pub struct RustRunner;

impl LanguageRunner for RustRunner {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command> {
        let source = dir.join("candidate.rs");
        let binary = dir.join("candidate");
        write(&source, &format!("{code}\n\nfn main() {{\n{test_code}\n}}\n"))?;
        Ok(chained(dir, "rustc", &["-O", "-o", "candidate", "candidate.rs"], &binary))
    }
}

/// Compiles with `gcc` and runs the resulting binary.
pub struct CRunner;

impl LanguageRunner for CRunner {
    fn language(&self) -> Language {
        Language::C
    }

    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command> {
        let source = dir.join("candidate.c");
        let binary = dir.join("candidate");
        write(&source, &format!("{code}\n\n{test_code}\n"))?;
        Ok(chained(dir, "gcc", &["-O2", "-o", "candidate", "candidate.c"], &binary))
    }
}

/// Compiles with `g++` and runs the resulting binary.
pub struct CppRunner;

impl LanguageRunner for CppRunner {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command> {
        let source = dir.join("candidate.cpp");
        let binary = dir.join("candidate");
        write(&source, &format!("{code}\n\n{test_code}\n"))?;
        Ok(chained(dir, "g++", &["-O2", "-std=c++17", "-o", "candidate", "candidate.cpp"], &binary))
    }
}

/// Runs the combined source with `go run`; Go's toolchain compiles and
/// executes in one step so no separate binary is staged.
pub struct GoRunner;

impl LanguageRunner for GoRunner {
    fn language(&self) -> Language {
        Language::Go
    }

    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command> {
        let source = dir.join("candidate.go");
        write(&source, &format!("{code}\n\n{test_code}\n"))?;
        let mut command = Command::new("go");
        command.args(["run", "candidate.go"]).current_dir(dir);
        Ok(command)
    }
}

/// Compiles `Main.java` with `javac` and runs it with `java`. The
/// combined source must declare a public class named `Main`.
pub struct JavaRunner;

impl LanguageRunner for JavaRunner {
    fn language(&self) -> Language {
        Language::Java
    }

    fn prepare(&self, dir: &Path, code: &str, test_code: &str) -> Result<Command> {
        let source = dir.join("Main.java");
        write(&source, &format!("{code}\n\n{test_code}\n"))?;
        let mut command = Command::new("sh");
        command.args(["-c", "javac Main.java && java Main"]).current_dir(dir);
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rust_runner_wraps_test_code_in_main() {
        let dir = tempdir().expect("tempdir");
        let runner = RustRunner;
        runner.prepare(dir.path(), "fn add(a: i32, b: i32) -> i32 { a + b }", "assert_eq!(add(1, 2), 3);").unwrap();
        let contents = fs::read_to_string(dir.path().join("candidate.rs")).unwrap();
        assert!(contents.contains("fn main()"));
        assert!(contents.contains("assert_eq!(add"));
    }

    #[test]
    fn java_runner_stages_main_java() {
        let dir = tempdir().expect("tempdir");
        let runner = JavaRunner;
        runner.prepare(dir.path(), "public class Main { static int add(int a, int b) { return a + b; } }", "public static void main(String[] args) {}").unwrap();
        assert!(dir.path().join("Main.java").exists());
    }

    #[test]
    fn go_runner_uses_go_run() {
        let dir = tempdir().expect("tempdir");
        let runner = GoRunner;
        let command = runner.prepare(dir.path(), "package main", "func main() {}").unwrap();
        assert_eq!(command.as_std().get_program().to_str(), Some("go"));
    }
}
