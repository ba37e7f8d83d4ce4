//! The canonical `Pattern` record and its lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CoherencyScore, Language, PatternId};

/// Lifecycle status of a [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternStatus {
    /// Coherent enough to store but lacking test proof. Cannot be
    /// returned by a PULL decision.
    Candidate,
    /// Tests passed and coherency crossed the admission threshold.
    Proven,
    /// Soft-deleted; the record remains for audit purposes.
    Retired,
}

/// Coarse classification of what a pattern demonstrates, free-form enough
/// to cover arbitrary client taxonomies but still a plain string so the
/// store can index it.
pub type PatternType = String;

/// The canonical pattern record. Every mutation path runs through
/// `PatternStore`; this type itself only enforces shape, not the
/// cross-field invariants (those live in the store, which is the only
/// component allowed to construct a `proven` pattern).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    /// Opaque identity.
    pub id: PatternId,
    /// Human label, unique within `(name, language)` among proven patterns.
    pub name: String,
    /// Source language.
    pub language: Language,
    /// The stored source code.
    pub code: String,
    /// Declared test code; empty when no tests were supplied.
    pub test_code: String,
    /// Free-text description used by the Ranker's relevance heuristic.
    pub description: String,
    /// Short labels used by tag-overlap relevance and filters.
    pub tags: Vec<String>,
    /// Coarse classification (e.g. `"algorithm"`, `"idiom"`).
    pub pattern_type: PatternType,
    /// Self-reported or inferred complexity label.
    pub complexity: String,
    /// Most recent coherency score.
    pub coherency_score: CoherencyScore,
    /// Whether the declared test, if any, passed at admission time.
    pub test_passed: bool,
    /// Who submitted the pattern (human or automated author tag).
    pub author: String,
    /// Count of `feedback`/`recordUsage` calls.
    pub usage_count: u64,
    /// Count of those calls reporting success.
    pub success_count: u64,
    /// Timestamp of the most recent usage feedback.
    pub last_used: Option<DateTime<Utc>>,
    /// Creation timestamp; immutable after insert.
    pub created_at: DateTime<Utc>,
    /// Parent pattern, when this one was produced by an explicit evolution.
    pub parent_pattern_id: Option<PatternId>,
    /// Ordered list of evolution version ids (oldest first).
    pub evolution_history: Vec<PatternId>,
    /// Lifecycle status.
    pub status: PatternStatus,
}

impl Pattern {
    /// `true` when the record satisfies the store invariant
    /// `status = proven ⇒ testPassed = true ∧ coherencyScore.total ≥ admissionThreshold`.
    #[must_use]
    pub fn satisfies_proven_invariant(&self, admission_threshold: f64) -> bool {
        if self.status != PatternStatus::Proven {
            return true;
        }
        self.test_passed && self.coherency_score.total >= admission_threshold
    }

    /// Reliability used by the Ranker: `successCount / usageCount`, with
    /// an optimistic default of `0.5` when the pattern has never been
    /// used.
    #[must_use]
    pub fn reliability(&self) -> f64 {
        if self.usage_count == 0 {
            crate::constants::DEFAULT_RELIABILITY
        } else {
            self.success_count as f64 / self.usage_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pattern {
        Pattern {
            id: PatternId::new(),
            name: "add".to_owned(),
            language: Language::Rust,
            code: "fn add(a: i32, b: i32) -> i32 { a + b }".to_owned(),
            test_code: "assert_eq!(add(1, 2), 3);".to_owned(),
            description: "add two numbers".to_owned(),
            tags: vec!["math".to_owned()],
            pattern_type: "function".to_owned(),
            complexity: "trivial".to_owned(),
            coherency_score: CoherencyScore::new(0.9, 0.9, 0.9, 0.9, 0.9),
            test_passed: true,
            author: "tester".to_owned(),
            usage_count: 0,
            success_count: 0,
            last_used: None,
            created_at: Utc::now(),
            parent_pattern_id: None,
            evolution_history: Vec::new(),
            status: PatternStatus::Proven,
        }
    }

    #[test]
    fn proven_with_failed_test_violates_invariant() {
        let mut p = sample();
        p.test_passed = false;
        assert!(!p.satisfies_proven_invariant(0.6));
    }

    #[test]
    fn proven_with_low_coherency_violates_invariant() {
        let mut p = sample();
        p.coherency_score = CoherencyScore::new(0.1, 0.1, 0.1, 0.1, 0.1);
        assert!(!p.satisfies_proven_invariant(0.6));
    }

    #[test]
    fn candidate_never_violates_invariant() {
        let mut p = sample();
        p.status = PatternStatus::Candidate;
        p.test_passed = false;
        p.coherency_score = CoherencyScore::zero();
        assert!(p.satisfies_proven_invariant(0.6));
    }

    #[test]
    fn unused_pattern_has_optimistic_reliability() {
        let p = sample();
        assert_eq!(p.reliability(), 0.5);
    }
}
