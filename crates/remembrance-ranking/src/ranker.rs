//! `relevance`/`composite` scoring (spec §4.F) over a candidate list.

use std::cmp::Ordering;
use std::collections::HashSet;

use remembrance_domain::constants::{WEIGHT_COHERENCY, WEIGHT_HEALING_BOOST, WEIGHT_RELEVANCE, WEIGHT_RELIABILITY};
use remembrance_domain::entities::HealingStats;
use remembrance_domain::entities::Pattern;

use crate::concepts;
use crate::query::Query;

const WEIGHT_TOKEN_OVERLAP: f64 = 0.35;
const WEIGHT_TAG_JACCARD: f64 = 0.25;
const WEIGHT_CONCEPT_EXPANSION: f64 = 0.20;
const WEIGHT_LANGUAGE_MATCH: f64 = 0.20;

/// Composite ties this close are broken by coherency/usage/age rather
/// than by the raw float comparison.
const TIE_EPSILON: f64 = 1e-9;

/// A pattern with its computed relevance and composite scores.
#[derive(Debug, Clone)]
pub struct ScoredPattern {
    /// The scored pattern.
    pub pattern: Pattern,
    /// §4.F relevance: how well the pattern answers the query.
    pub relevance: f64,
    /// §4.F composite: relevance blended with coherency, reliability, and
    /// the healing track record.
    pub composite: f64,
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn token_overlap(query: &Query, pattern: &Pattern) -> f64 {
    let query_tokens = tokenize(&query.description);
    let haystack = format!("{} {}", pattern.name, pattern.description);
    let pattern_tokens = tokenize(&haystack);
    jaccard(&query_tokens, &pattern_tokens)
}

fn tag_jaccard(query: &Query, pattern: &Pattern) -> f64 {
    let query_tags: HashSet<String> = query.tags.iter().map(|t| t.to_lowercase()).collect();
    let pattern_tags: HashSet<String> = pattern.tags.iter().map(|t| t.to_lowercase()).collect();
    jaccard(&query_tags, &pattern_tags)
}

fn concept_expansion(query: &Query, pattern: &Pattern) -> f64 {
    let expanded: HashSet<String> = query
        .tags
        .iter()
        .flat_map(|tag| concepts::expand(&tag.to_lowercase()))
        .map(str::to_owned)
        .collect();
    if expanded.is_empty() {
        return 0.0;
    }
    let pattern_tags: HashSet<String> = pattern.tags.iter().map(|t| t.to_lowercase()).collect();
    jaccard(&expanded, &pattern_tags)
}

fn language_match(query: &Query, pattern: &Pattern) -> f64 {
    match query.language {
        Some(language) => language.match_score(pattern.language),
        None => 1.0,
    }
}

/// Blend of token overlap, tag Jaccard, concept expansion, and language
/// match, per the weights in spec §4.F.
#[must_use]
pub fn relevance(query: &Query, pattern: &Pattern) -> f64 {
    WEIGHT_TOKEN_OVERLAP * token_overlap(query, pattern)
        + WEIGHT_TAG_JACCARD * tag_jaccard(query, pattern)
        + WEIGHT_CONCEPT_EXPANSION * concept_expansion(query, pattern)
        + WEIGHT_LANGUAGE_MATCH * language_match(query, pattern)
}

/// `0.45·relevance + 0.30·coherency + 0.15·reliability + 0.10·(healingBoost/1.5)`.
#[must_use]
pub fn composite(query: &Query, pattern: &Pattern, healing_stats: &HealingStats) -> f64 {
    let relevance = relevance(query, pattern);
    WEIGHT_RELEVANCE * relevance
        + WEIGHT_COHERENCY * pattern.coherency_score.total
        + WEIGHT_RELIABILITY * pattern.reliability()
        + WEIGHT_HEALING_BOOST * (healing_stats.composite_boost() / remembrance_domain::constants::HEALING_BOOST_CAP)
}

/// Score every `(pattern, healingStats)` pair against `query` and return
/// them ordered best-first. Ties are broken by higher coherency, then
/// higher usage count, then earlier `createdAt`.
#[must_use]
pub fn rank(query: &Query, items: Vec<(Pattern, HealingStats)>) -> Vec<ScoredPattern> {
    let mut scored: Vec<ScoredPattern> = items
        .into_iter()
        .map(|(pattern, stats)| {
            let relevance = relevance(query, &pattern);
            let composite = composite(query, &pattern, &stats);
            ScoredPattern { pattern, relevance, composite }
        })
        .collect();

    scored.sort_by(|a, b| compare_ranked(a, b));
    scored
}

fn compare_ranked(a: &ScoredPattern, b: &ScoredPattern) -> Ordering {
    if (a.composite - b.composite).abs() > TIE_EPSILON {
        return b.composite.partial_cmp(&a.composite).unwrap_or(Ordering::Equal);
    }
    if (a.pattern.coherency_score.total - b.pattern.coherency_score.total).abs() > TIE_EPSILON {
        return b
            .pattern
            .coherency_score
            .total
            .partial_cmp(&a.pattern.coherency_score.total)
            .unwrap_or(Ordering::Equal);
    }
    if a.pattern.usage_count != b.pattern.usage_count {
        return b.pattern.usage_count.cmp(&a.pattern.usage_count);
    }
    a.pattern.created_at.cmp(&b.pattern.created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_domain::value_objects::{CoherencyScore, Language, PatternId};

    fn pattern(name: &str, description: &str, tags: &[&str]) -> Pattern {
        Pattern {
            id: PatternId::new(),
            name: name.to_owned(),
            language: Language::Rust,
            code: String::new(),
            test_code: String::new(),
            description: description.to_owned(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
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
            status: remembrance_domain::entities::PatternStatus::Proven,
        }
    }

    #[test]
    fn exact_description_match_scores_high_token_overlap() {
        let query = Query {
            description: "retry with backoff".to_owned(),
            tags: Vec::new(),
            language: None,
        };
        let p = pattern("retry_backoff", "retry with backoff", &[]);
        assert!(token_overlap(&query, &p) > 0.9);
    }

    #[test]
    fn unrelated_description_scores_zero_overlap() {
        let query = Query {
            description: "retry with backoff".to_owned(),
            tags: Vec::new(),
            language: None,
        };
        let p = pattern("quicksort", "sorts a slice in place", &[]);
        assert_eq!(token_overlap(&query, &p), 0.0);
    }

    #[test]
    fn concept_tag_matches_member_tags() {
        let query = Query {
            description: String::new(),
            tags: vec!["iteration".to_owned()],
            language: None,
        };
        let p = pattern("loop_sum", "", &["loop"]);
        assert!(concept_expansion(&query, &p) > 0.0);
    }

    #[test]
    fn missing_query_language_never_penalizes() {
        let query = Query {
            description: String::new(),
            tags: Vec::new(),
            language: None,
        };
        let p = pattern("p", "", &[]);
        assert_eq!(language_match(&query, &p), 1.0);
    }

    #[test]
    fn rank_orders_best_composite_first() {
        let query = Query {
            description: "add two numbers".to_owned(),
            tags: Vec::new(),
            language: None,
        };
        let strong = pattern("add", "add two numbers", &[]);
        let mut weak = pattern("unrelated", "sorts a slice", &[]);
        weak.coherency_score = CoherencyScore::new(0.1, 0.1, 0.1, 0.1, 0.1);

        let ranked = rank(&query, vec![(weak, HealingStats::default()), (strong.clone(), HealingStats::default())]);
        assert_eq!(ranked[0].pattern.id, strong.id);
    }

    #[test]
    fn ties_break_by_coherency_then_usage_then_age() {
        let query = Query::default();
        let mut a = pattern("a", "", &[]);
        let mut b = pattern("b", "", &[]);
        a.coherency_score = CoherencyScore::new(0.9, 0.9, 0.9, 0.9, 0.9);
        b.coherency_score = a.coherency_score;
        a.usage_count = 5;
        b.usage_count = 1;

        let ranked = rank(&query, vec![(b, HealingStats::default()), (a.clone(), HealingStats::default())]);
        assert_eq!(ranked[0].pattern.id, a.id);
    }
}
