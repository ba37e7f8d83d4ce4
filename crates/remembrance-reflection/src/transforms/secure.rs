//! Redacts hardcoded credential literals and annotates any remaining
//! flagged construct with a comment so a reviewer can find it quickly.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use remembrance_safety::{CheckOutcome, SafetyGate};

static CREDENTIAL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(password|passwd|secret|api[_-]?key)(\s*[:=]\s*)(["'])[^"']{4,}(["'])"#).expect("valid regex"));

/// Runs `code` through credential redaction, then annotates any
/// remaining veto-level violation (besides credentials, already handled)
/// with a one-line comment using `comment_prefix`. Idempotent: redacted
/// literals stay redacted, and annotations are only added once.
#[must_use]
pub fn apply(code: &str, gate: &SafetyGate, comment_prefix: Option<&str>) -> String {
    let redacted = redact_credentials(code);
    match comment_prefix {
        Some(prefix) => annotate_remaining_violations(&redacted, gate, prefix),
        None => redacted,
    }
}

fn redact_credentials(code: &str) -> String {
    CREDENTIAL_LITERAL
        .replace_all(code, |caps: &Captures| format!("{}{}{}redacted{}", &caps[1], &caps[2], &caps[3], &caps[4]))
        .into_owned()
}

fn annotate_remaining_violations(code: &str, gate: &SafetyGate, prefix: &str) -> String {
    let CheckOutcome::Violations(violations) = gate.check(code) else {
        return code.to_owned();
    };

    let mut lines: Vec<String> = code.lines().map(str::to_owned).collect();
    for violation in violations.iter().filter(|v| v.vetoes && v.principle != "no-hardcoded-credentials") {
        let marker = format!("{prefix} flagged: {}", violation.reason);
        if !lines.iter().any(|l| l.trim() == marker) {
            lines.insert(0, marker);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_hardcoded_password() {
        let gate = SafetyGate::with_defaults();
        let out = apply(r#"password = "hunter2222""#, &gate, Some("//"));
        assert!(!out.contains("hunter2222"));
        assert!(out.contains("redacted"));
    }

    #[test]
    fn annotates_eval_once() {
        let gate = SafetyGate::with_defaults();
        let out = apply("eval(userInput);", &gate, Some("//"));
        assert_eq!(out.matches("flagged:").count(), 1);
    }

    #[test]
    fn is_idempotent() {
        let gate = SafetyGate::with_defaults();
        let once = apply(r#"password = "hunter2222"; eval(x);"#, &gate, Some("//"));
        let twice = apply(&once, &gate, Some("//"));
        assert_eq!(once, twice);
    }

    #[test]
    fn clean_code_is_untouched() {
        let gate = SafetyGate::with_defaults();
        let input = "fn add(a: i32, b: i32) -> i32 { a + b }";
        assert_eq!(apply(input, &gate, Some("//")), input);
    }
}
