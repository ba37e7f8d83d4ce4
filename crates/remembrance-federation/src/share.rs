//! The personal→community share-write rule (spec §4.J): only test-backed
//! patterns at or above the coherency floor travel upward a tier.

use remembrance_domain::constants::DEFAULT_SHARE_MIN_COHERENCY;
use remembrance_domain::entities::Pattern;

/// `true` when `pattern` is eligible to be written from the personal
/// store up into the community store.
#[must_use]
pub fn eligible_for_community_share(pattern: &Pattern) -> bool {
    pattern.test_passed && pattern.coherency_score.total >= DEFAULT_SHARE_MIN_COHERENCY
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_domain::entities::PatternStatus;
    use remembrance_domain::value_objects::{CoherencyScore, Language, PatternId};

    fn pattern(test_passed: bool, coherency: f64) -> Pattern {
        Pattern {
            id: PatternId::new(),
            name: "p".to_owned(),
            language: Language::Rust,
            code: String::new(),
            test_code: String::new(),
            description: String::new(),
            tags: Vec::new(),
            pattern_type: "function".to_owned(),
            complexity: "trivial".to_owned(),
            coherency_score: CoherencyScore::new(coherency, coherency, coherency, coherency, coherency),
            test_passed,
            author: "tester".to_owned(),
            usage_count: 0,
            success_count: 0,
            last_used: None,
            created_at: chrono::Utc::now(),
            parent_pattern_id: None,
            evolution_history: Vec::new(),
            status: PatternStatus::Proven,
        }
    }

    #[test]
    fn untested_pattern_cannot_share() {
        assert!(!eligible_for_community_share(&pattern(false, 0.95)));
    }

    #[test]
    fn low_coherency_pattern_cannot_share() {
        assert!(!eligible_for_community_share(&pattern(true, 0.5)));
    }

    #[test]
    fn tested_high_coherency_pattern_can_share() {
        assert!(eligible_for_community_share(&pattern(true, 0.8)));
    }
}
