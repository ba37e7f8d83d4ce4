//! Built-in principles shipped with every fresh registry.

use crate::principle::{Principle, Severity};

/// The regex-based built-in principles. Unbounded recursion is also a
/// built-in category but is detected structurally in
/// [`crate::gate::SafetyGate::check`] rather than via a single pattern.
pub fn defaults() -> Vec<Principle> {
    vec![
        no_eval(),
        no_shell_injection(),
        no_hardcoded_credentials(),
        no_filesystem_escape(),
    ]
}

fn no_eval() -> Principle {
    Principle::new(
        "no-eval",
        "Rejects code that evaluates strings as executable code at runtime",
        Severity::Veto,
        [
            (r"\beval\s*\(", "calls eval() on a dynamic string"),
            (r"\bnew\s+Function\s*\(", "builds a Function from a dynamic string"),
            (r"(?i)\bexec\s*\(\s*(open\(|input\(|f(['\"])|'|\")", "executes dynamically-built source"),
            (r"__import__\s*\(", "dynamically imports by name, a common eval-bypass"),
        ],
    )
    .unwrap_or_else(|e| unreachable!("built-in pattern for no-eval must compile: {e}"))
}

fn no_shell_injection() -> Principle {
    Principle::new(
        "no-shell-injection",
        "Rejects shell invocations built from unsanitized, interpolated strings",
        Severity::Veto,
        [
            (r"os\.system\s*\(", "shells out via os.system"),
            (r"subprocess\.\w+\([^)]*shell\s*=\s*True", "subprocess call with shell=True"),
            (r"child_process\.(exec|execSync)\s*\(", "Node child_process.exec with a built string"),
            (r"Runtime\.getRuntime\(\)\.exec\s*\(", "Java Runtime.exec with a built string"),
            (r"`[^`]*\$\{[^}]*\}[^`]*`\s*\.\s*(exec|system)", "shell template literal with interpolation"),
        ],
    )
    .unwrap_or_else(|e| unreachable!("built-in pattern for no-shell-injection must compile: {e}"))
}

fn no_hardcoded_credentials() -> Principle {
    Principle::new(
        "no-hardcoded-credentials",
        "Flags literal secrets embedded directly in source",
        Severity::Veto,
        [
            (r#"(?i)(password|passwd|secret|api[_-]?key)\s*[:=]\s*["'][^"']{4,}["']"#, "hardcoded credential literal"),
            (r"AKIA[0-9A-Z]{16}", "embedded AWS access key id"),
            (r"-----BEGIN (RSA |EC )?PRIVATE KEY-----", "embedded private key material"),
        ],
    )
    .unwrap_or_else(|e| unreachable!("built-in pattern for no-hardcoded-credentials must compile: {e}"))
}

fn no_filesystem_escape() -> Principle {
    Principle::new(
        "no-filesystem-escape",
        "Rejects path traversal or absolute-path writes outside the sandbox",
        Severity::Veto,
        [
            (r"\.\./\.\./\.\.", "suspicious repeated parent-directory traversal"),
            (r#"open\s*\(\s*["']/etc/"#, "opens an absolute system path"),
            (r"std::fs::(remove_dir_all|write)\s*\(\s*\"/", "writes to an absolute root-level path"),
        ],
    )
    .unwrap_or_else(|e| unreachable!("built-in pattern for no-filesystem-escape must compile: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_principle_flags_eval_call() {
        let principle = no_eval();
        assert!(principle.first_match("eval(userInput)").is_some());
    }

    #[test]
    fn shell_principle_flags_shell_true() {
        let principle = no_shell_injection();
        assert!(principle.first_match("subprocess.run(cmd, shell=True)").is_some());
    }

    #[test]
    fn credentials_principle_flags_literal_password() {
        let principle = no_hardcoded_credentials();
        assert!(principle.first_match(r#"password = "hunter22""#).is_some());
    }

    #[test]
    fn clean_code_matches_nothing() {
        for principle in defaults() {
            assert!(principle.first_match("fn add(a: i32, b: i32) -> i32 { a + b }").is_none());
        }
    }
}
