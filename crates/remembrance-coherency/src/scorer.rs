//! Ties the five dimension functions together into a single pure scoring
//! entry point.

use remembrance_domain::value_objects::{CoherencyScore, Language};
use remembrance_safety::SafetyGate;

use crate::dimensions;

/// Computes a full [`CoherencyScore`] for a piece of code, given the
/// safety registry it should be checked against.
///
/// Pure and deterministic: the same `(code, language, gate)` always
/// produces the same score, and scoring never mutates `gate`.
pub struct CoherencyScorer<'a> {
    gate: &'a SafetyGate,
}

impl<'a> CoherencyScorer<'a> {
    /// Builds a scorer backed by the given safety registry.
    #[must_use]
    pub fn new(gate: &'a SafetyGate) -> Self {
        Self { gate }
    }

    /// Scores `code` across all five dimensions and assembles the
    /// weighted total.
    #[must_use]
    pub fn score(&self, code: &str, language: Language) -> CoherencyScore {
        CoherencyScore::new(
            dimensions::simplicity(code),
            dimensions::readability(code),
            dimensions::security(code, self.gate),
            dimensions::unity(code),
            dimensions::correctness(code, language),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_rust_scores_well_above_zero() {
        let gate = SafetyGate::with_defaults();
        let scorer = CoherencyScorer::new(&gate);
        let score = scorer.score("fn add(a: i32, b: i32) -> i32 { a + b }", Language::Rust);
        assert!(score.total > 0.8, "total was {}", score.total);
    }

    #[test]
    fn dangerous_code_scores_lower_than_clean_code() {
        let gate = SafetyGate::with_defaults();
        let scorer = CoherencyScorer::new(&gate);
        let clean = scorer.score("fn add(a: i32, b: i32) -> i32 { a + b }", Language::Rust);
        let risky = scorer.score("fn run(x: &str) { eval(x); }", Language::JavaScript);
        assert!(risky.total < clean.total);
    }
}
