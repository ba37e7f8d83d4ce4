//! The `SafetyGate` itself: a copy-on-write principle registry plus the
//! one structural (non-regex) built-in, unbounded recursion detection.

use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::builtins;
use crate::principle::{Principle, Severity};

/// One matched violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the principle that matched.
    pub principle: String,
    /// Reason reported by the matching rule.
    pub reason: String,
    /// Whether this violation alone vetoes admission.
    pub vetoes: bool,
}

/// Outcome of a `SafetyGate::check` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No principle matched.
    Pass,
    /// One or more principles matched, in registry order.
    Violations(Vec<Violation>),
}

impl CheckOutcome {
    /// `true` when any recorded violation has veto severity.
    #[must_use]
    pub fn has_veto(&self) -> bool {
        match self {
            Self::Pass => false,
            Self::Violations(v) => v.iter().any(|violation| violation.vetoes),
        }
    }
}

/// Regex-principle registry plus the gate's check entry point. The
/// registry snapshot is copy-on-write: [`SafetyGate::register`] installs a
/// new immutable `Vec<Principle>` that subsequent `check` calls observe,
/// without requiring checkers in flight to block on a lock.
pub struct SafetyGate {
    principles: ArcSwap<Vec<Principle>>,
}

impl SafetyGate {
    /// A gate pre-loaded with the built-in principles.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            principles: ArcSwap::new(Arc::new(builtins::defaults())),
        }
    }

    /// Replace the principle registry with `principles` (built-ins plus
    /// any custom additions the caller wants to keep).
    pub fn register(&self, principles: Vec<Principle>) {
        self.principles.store(Arc::new(principles));
    }

    /// Current registry snapshot, for listing/inspection.
    #[must_use]
    pub fn principles(&self) -> Arc<Vec<Principle>> {
        self.principles.load_full()
    }

    /// Check `code` against the current registry snapshot. Pure given a
    /// fixed snapshot: the same code and the same registry always produce
    /// the same outcome.
    #[must_use]
    pub fn check(&self, code: &str) -> CheckOutcome {
        let snapshot = self.principles.load();
        let mut violations: Vec<Violation> = snapshot
            .iter()
            .filter_map(|principle| {
                principle.first_match(code).map(|rule| Violation {
                    principle: principle.name.clone(),
                    reason: rule.reason.clone(),
                    vetoes: principle.severity == Severity::Veto,
                })
            })
            .collect();

        if let Some(reason) = detect_unbounded_recursion(code) {
            violations.push(Violation {
                principle: "unbounded-recursion".to_owned(),
                reason,
                vetoes: false,
            });
        }

        if violations.is_empty() {
            CheckOutcome::Pass
        } else {
            CheckOutcome::Violations(violations)
        }
    }
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self::with_defaults()
    }
}

static FN_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:fn|def|function)\s+(\w+)\s*\([^)]*\)[^{:]*[{:]").expect("valid regex"));

/// Heuristic, language-agnostic check for a function whose very first
/// statement calls itself with no visible guard (`if`/`match`) ahead of
/// the call. Regex backreferences aren't available in the `regex` crate,
/// so this scans in two passes rather than using a single pattern.
fn detect_unbounded_recursion(code: &str) -> Option<String> {
    for captures in FN_HEADER_RE.captures_iter(code) {
        let name = captures.get(1).expect("group 1 always present").as_str();
        let body_start = captures.get(0).expect("whole match always present").end();
        let body = code[body_start..].trim_start_matches(['{', '\n', ' ', '\t']);
        let call = format!("{name}(");
        let Some(call_offset) = body.find(&call) else {
            continue;
        };
        let guarded = body[..call_offset].contains("if ") || body[..call_offset].contains("if(") || body[..call_offset].contains("match ");
        if !guarded && body.trim_start().starts_with(&call) {
            return Some(format!("function '{name}' calls itself as its first statement with no visible base case"));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_clean_code() {
        let gate = SafetyGate::with_defaults();
        assert_eq!(gate.check("fn add(a: i32, b: i32) -> i32 { a + b }"), CheckOutcome::Pass);
    }

    #[test]
    fn vetoes_eval() {
        let gate = SafetyGate::with_defaults();
        let outcome = gate.check("fn run(x: &str) { eval(x); }");
        assert!(outcome.has_veto());
    }

    #[test]
    fn flags_immediate_self_recursion_without_guard() {
        let gate = SafetyGate::with_defaults();
        let outcome = gate.check("fn spin(n: i32) -> i32 { spin(n + 1) }");
        match outcome {
            CheckOutcome::Violations(v) => assert!(v.iter().any(|viol| viol.principle == "unbounded-recursion")),
            CheckOutcome::Pass => panic!("expected a recursion warning"),
        }
    }

    #[test]
    fn guarded_recursion_is_not_flagged() {
        let gate = SafetyGate::with_defaults();
        let outcome = gate.check("fn fact(n: u64) -> u64 { if n <= 1 { 1 } else { n * fact(n - 1) } }");
        assert_eq!(outcome, CheckOutcome::Pass);
    }

    #[test]
    fn registry_swap_is_observed_by_later_checks() {
        let gate = SafetyGate::with_defaults();
        gate.register(vec![
            Principle::new("no-foo", "no foo allowed", Severity::Veto, [(r"\bfoo\b", "contains foo")]).expect("compiles"),
        ]);
        let outcome = gate.check("let foo = 1;");
        assert!(outcome.has_veto());
        assert_eq!(gate.check("eval(x)"), CheckOutcome::Pass);
    }
}
