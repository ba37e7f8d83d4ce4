//! The PULL/EVOLVE/GENERATE decision procedure (spec §4.G).

use remembrance_domain::constants::{RESOLVE_EVOLVE_THRESHOLD, RESOLVE_PULL_THRESHOLD};

use crate::ranker::ScoredPattern;
use crate::whispers;

/// The Resolver's decision for a ranked list of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Top composite at/above [`RESOLVE_PULL_THRESHOLD`]: return the
    /// pattern as-is, optionally healing it first.
    Pull,
    /// Top composite at/above [`RESOLVE_EVOLVE_THRESHOLD`] but below
    /// pull: return the pattern after a longer healing loop.
    Evolve,
    /// No candidate cleared [`RESOLVE_EVOLVE_THRESHOLD`]: signal that
    /// new code must be generated instead.
    Generate,
}

/// The Resolver's full answer: a decision, the best match (absent for
/// `Generate`), the runner-up (if any), and a deterministic whisper.
#[derive(Debug, Clone)]
pub struct ResolveResult {
    /// PULL, EVOLVE, or GENERATE.
    pub decision: Decision,
    /// The top-ranked candidate, when one cleared the EVOLVE threshold.
    pub best: Option<ScoredPattern>,
    /// The second-best candidate, if a ranked list of at least two was
    /// supplied.
    pub alternative: Option<ScoredPattern>,
    /// A deterministic, human-readable note about the decision.
    pub whisper: &'static str,
}

/// Decide over an already-ranked candidate list (best-first, as returned
/// by [`crate::ranker::rank`]).
#[must_use]
pub fn resolve(ranked: &[ScoredPattern]) -> ResolveResult {
    let Some(top) = ranked.first() else {
        return ResolveResult {
            decision: Decision::Generate,
            best: None,
            alternative: None,
            whisper: whispers::select(Decision::Generate, 0),
        };
    };

    let decision = if top.composite >= RESOLVE_PULL_THRESHOLD {
        Decision::Pull
    } else if top.composite >= RESOLVE_EVOLVE_THRESHOLD {
        Decision::Evolve
    } else {
        Decision::Generate
    };

    let alternative = ranked.get(1).cloned();

    if decision == Decision::Generate {
        return ResolveResult {
            decision,
            best: None,
            alternative,
            whisper: whispers::select(decision, 0),
        };
    }

    let key = top.pattern.name.len() + top.pattern.code.len();
    ResolveResult {
        decision,
        whisper: whispers::select(decision, key),
        best: Some(top.clone()),
        alternative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_domain::entities::PatternStatus;
    use remembrance_domain::value_objects::{CoherencyScore, Language, PatternId};

    fn scored(composite: f64) -> ScoredPattern {
        let pattern = remembrance_domain::entities::Pattern {
            id: PatternId::new(),
            name: "p".to_owned(),
            language: Language::Rust,
            code: "fn f() {}".to_owned(),
            test_code: String::new(),
            description: String::new(),
            tags: Vec::new(),
            pattern_type: "function".to_owned(),
            complexity: "trivial".to_owned(),
            coherency_score: CoherencyScore::new(0.8, 0.8, 0.8, 0.8, 0.8),
            test_passed: true,
            author: "tester".to_owned(),
            usage_count: 0,
            success_count: 0,
            last_used: None,
            created_at: chrono::Utc::now(),
            parent_pattern_id: None,
            evolution_history: Vec::new(),
            status: PatternStatus::Proven,
        };
        ScoredPattern { pattern, relevance: 0.5, composite }
    }

    #[test]
    fn high_composite_pulls() {
        let result = resolve(&[scored(0.9)]);
        assert_eq!(result.decision, Decision::Pull);
        assert!(result.best.is_some());
    }

    #[test]
    fn mid_composite_evolves() {
        let result = resolve(&[scored(0.6)]);
        assert_eq!(result.decision, Decision::Evolve);
    }

    #[test]
    fn low_composite_generates_with_no_best() {
        let result = resolve(&[scored(0.2)]);
        assert_eq!(result.decision, Decision::Generate);
        assert!(result.best.is_none());
    }

    #[test]
    fn empty_ranked_list_generates() {
        let result = resolve(&[]);
        assert_eq!(result.decision, Decision::Generate);
    }

    #[test]
    fn boundary_is_inclusive() {
        let result = resolve(&[scored(RESOLVE_PULL_THRESHOLD)]);
        assert_eq!(result.decision, Decision::Pull);
    }
}
