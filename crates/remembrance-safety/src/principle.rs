//! Principles: named, ordered lists of `{pattern, reason}` regex rules.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Severity attached to a principle. `Veto` rejects the submission outright;
/// `Warn` is recorded but never blocks admission on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks admission.
    Veto,
    /// Surfaced to the caller but does not block admission.
    Warn,
}

/// One rule within a principle: a compiled pattern and the reason shown to
/// the caller when it matches.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Compiled match pattern.
    pub pattern: Regex,
    /// Human-readable explanation shown in the violation.
    pub reason: String,
}

/// A named safety principle: a severity and an ordered list of rules.
/// The first matching rule within a principle determines the reported
/// reason; a principle with no matching rule contributes nothing.
#[derive(Debug, Clone)]
pub struct Principle {
    /// Stable identifier (`"no-eval"`, `"no-shell-injection"`, ...).
    pub name: String,
    /// One-line description shown in registry listings.
    pub description: String,
    /// Whether a match vetoes admission or merely warns.
    pub severity: Severity,
    /// Ordered rules; evaluated first-to-last, first match wins.
    pub rules: Vec<Rule>,
}

impl Principle {
    /// Build a principle from `(pattern, reason)` source strings. Returns
    /// `Err` if any pattern fails to compile — principle registration is
    /// the only point at which a bad regex can surface.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        rules: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Result<Self, regex::Error> {
        let rules = rules
            .into_iter()
            .map(|(pattern, reason)| {
                Regex::new(pattern).map(|pattern| Rule {
                    pattern,
                    reason: reason.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.into(),
            description: description.into(),
            severity,
            rules,
        })
    }

    /// First rule in this principle that matches `code`, if any.
    #[must_use]
    pub fn first_match(&self, code: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.pattern.is_match(code))
    }
}
