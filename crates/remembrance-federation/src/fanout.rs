//! Parallel tiered fan-out, partial-failure-tolerant merge, and
//! composite-ranked trim (spec §4.J).

use std::collections::HashMap;
use std::time::Duration;

use remembrance_domain::constants::{DEFAULT_FEDERATION_TIMEOUT_MS, DEFAULT_LOCAL_STORE_TIMEOUT_MS};
use remembrance_domain::entities::{HealingStats, Pattern};
use remembrance_domain::value_objects::Tier;
use remembrance_ranking::Query;
use tracing::warn;

use crate::source::FederationSource;

/// One tier's failure, recorded rather than propagated.
#[derive(Debug, Clone)]
pub struct TierError {
    /// The tier that failed.
    pub tier: Tier,
    /// Human-readable cause.
    pub message: String,
}

/// The outcome of a federated search: merged, ranked patterns plus any
/// per-tier failures.
#[derive(Debug, Clone, Default)]
pub struct MergedResults {
    /// Deduplicated, composite-ranked, limit-trimmed patterns.
    pub patterns: Vec<Pattern>,
    /// Tiers that failed or timed out; never fatal to the overall call.
    pub errors: Vec<TierError>,
}

fn tier_timeout(tier: &Tier) -> Option<Duration> {
    match tier {
        Tier::Local => None,
        Tier::Personal | Tier::Community => Some(Duration::from_millis(DEFAULT_LOCAL_STORE_TIMEOUT_MS)),
        Tier::Remote(_) => Some(Duration::from_millis(DEFAULT_FEDERATION_TIMEOUT_MS)),
    }
}

/// Fan a query out to every source in parallel, merge by `(name,
/// language)` with tier precedence, rank the merge by composite, and
/// trim to `limit`.
pub async fn federated_search(sources: &[Box<dyn FederationSource>], query: &Query, limit: usize) -> MergedResults {
    let calls = sources.iter().enumerate().map(|(index, source)| {
        let tier = source.tier();
        async move {
            let outcome = match tier_timeout(&tier) {
                None => source.search(query).await,
                Some(timeout) => match tokio::time::timeout(timeout, source.search(query)).await {
                    Ok(result) => result,
                    Err(_) => Err(remembrance_domain::Error::Timeout {
                        operation: format!("federated search on tier {}", tier.name()),
                        limit_ms: timeout.as_millis() as u64,
                    }),
                },
            };
            (index, tier, outcome)
        }
    });

    let results = futures::future::join_all(calls).await;

    let mut best: HashMap<(String, String), (u8, usize, Pattern)> = HashMap::new();
    let mut errors = Vec::new();

    for (index, tier, outcome) in results {
        match outcome {
            Ok(patterns) => {
                let precedence = tier.precedence();
                for pattern in patterns {
                    let key = (pattern.name.clone(), pattern.language.as_str().to_owned());
                    let candidate_rank = (precedence, index);
                    match best.get(&key) {
                        Some((existing_precedence, existing_index, _)) if (*existing_precedence, *existing_index) <= candidate_rank => {}
                        _ => {
                            best.insert(key, (precedence, index, pattern));
                        }
                    }
                }
            }
            Err(e) => {
                warn!(tier = %tier.name(), error = %e, "federation tier failed");
                errors.push(TierError { tier, message: e.to_string() });
            }
        }
    }

    let merged: Vec<(Pattern, HealingStats)> = best.into_values().map(|(_, _, pattern)| (pattern, HealingStats::default())).collect();
    let mut ranked = remembrance_ranking::rank(query, merged);
    ranked.truncate(limit);

    MergedResults {
        patterns: ranked.into_iter().map(|scored| scored.pattern).collect(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LocalSource;
    use remembrance_domain::entities::PatternStatus;
    use remembrance_domain::value_objects::{CoherencyScore, Language, PatternId};

    fn sample(name: &str) -> Pattern {
        Pattern {
            id: PatternId::new(),
            name: name.to_owned(),
            language: Language::Rust,
            code: String::new(),
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
        }
    }

    #[tokio::test]
    async fn local_precedence_wins_over_community_duplicate() {
        let name = "shared";
        let local_pattern = sample(name);
        let mut community_pattern = sample(name);
        community_pattern.id = PatternId::new();

        let sources: Vec<Box<dyn FederationSource>> = vec![
            Box::new(LocalSource::new(Tier::Local, move |_: &Query| Ok(vec![local_pattern.clone()]))),
            Box::new(LocalSource::new(Tier::Community, move |_: &Query| Ok(vec![community_pattern.clone()]))),
        ];

        let merged = federated_search(&sources, &Query::default(), 10).await;
        assert_eq!(merged.patterns.len(), 1);
    }

    #[tokio::test]
    async fn one_failing_tier_does_not_fail_the_whole_search() {
        let sources: Vec<Box<dyn FederationSource>> = vec![
            Box::new(LocalSource::new(Tier::Local, |_: &Query| Ok(vec![sample("a")]))),
            Box::new(LocalSource::new(Tier::Community, |_: &Query| {
                Err(remembrance_domain::Error::Internal { context: "boom".to_owned() })
            })),
        ];

        let merged = federated_search(&sources, &Query::default(), 10).await;
        assert_eq!(merged.patterns.len(), 1);
        assert_eq!(merged.errors.len(), 1);
    }

    #[tokio::test]
    async fn results_are_trimmed_to_limit() {
        let sources: Vec<Box<dyn FederationSource>> = vec![Box::new(LocalSource::new(Tier::Local, |_: &Query| {
            Ok(vec![sample("a"), sample("b"), sample("c")])
        }))];

        let merged = federated_search(&sources, &Query::default(), 2).await;
        assert_eq!(merged.patterns.len(), 2);
    }
}
