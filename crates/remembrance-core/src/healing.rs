//! Component I: the out-of-band healing pass over proven patterns whose
//! coherency has drifted below target, plus its rollback-safe swap.

use std::sync::Arc;

use remembrance_domain::entities::audit::AuditLogEntry;
use remembrance_domain::entities::{HealedVariant, Pattern, PatternStatus};
use remembrance_domain::events::DomainEvent;
use remembrance_domain::ports::events::EventBus;
use remembrance_domain::ports::store::{PatternFilter, PatternStorePort, PatternUpdate};
use remembrance_domain::value_objects::{PatternId, VariantId};
use remembrance_domain::Result;
use remembrance_language::LanguageRegistry;
use remembrance_reflection::ReflectionEngine;
use remembrance_safety::SafetyGate;
use remembrance_sandbox::{Sandbox, SandboxOptions};
use tracing::{info, warn};

/// Knobs for one `run_once` pass.
#[derive(Debug, Clone, Copy)]
pub struct HealingOptions {
    /// Patterns considered per run.
    pub max_heals_per_run: usize,
    /// Reflection loop iterations per attempt.
    pub max_loops: u32,
    /// Minimum coherency a pattern must already have to be skipped.
    pub heal_target: f64,
    /// Minimum coherency a healed variant must reach to be swapped in.
    pub promote_threshold: f64,
    /// Sandbox bounds used for the verify-or-rollback re-run.
    pub sandbox_options: SandboxOptions,
}

/// Outcome of healing one pattern.
#[derive(Debug, Clone)]
pub struct HealingOutcome {
    /// Pattern considered.
    pub pattern_id: PatternId,
    /// Whether `ReflectionEngine::heal` found any improvement at all.
    pub improved: bool,
    /// Whether the improvement was large enough, and verified, to be
    /// swapped into the pattern's live code.
    pub promoted: bool,
    /// Coherency total before healing.
    pub before: f64,
    /// Coherency total after healing (not necessarily promoted).
    pub after: f64,
}

/// Summary of a full `run_once` pass.
#[derive(Debug, Clone, Default)]
pub struct HealingReport {
    /// One entry per pattern considered, in the order processed.
    pub outcomes: Vec<HealingOutcome>,
}

/// Runs the bounded healing pass described in spec §4.I and exposes its
/// rollback machinery.
pub struct HealingSupervisor {
    gate: Arc<SafetyGate>,
    languages: Arc<LanguageRegistry>,
    sandbox: Arc<Sandbox>,
    store: Arc<dyn PatternStorePort>,
    events: Arc<dyn EventBus>,
}

impl HealingSupervisor {
    /// Builds a supervisor wired to the given ports.
    #[must_use]
    pub fn new(
        gate: Arc<SafetyGate>,
        languages: Arc<LanguageRegistry>,
        sandbox: Arc<Sandbox>,
        store: Arc<dyn PatternStorePort>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            gate,
            languages,
            sandbox,
            store,
            events,
        }
    }

    /// One healing pass: lowest-scoring proven patterns first, up to
    /// `options.max_heals_per_run`.
    pub async fn run_once(&self, options: HealingOptions) -> Result<HealingReport> {
        let mut proven = self
            .store
            .list(PatternFilter {
                status: Some(PatternStatus::Proven),
                ..PatternFilter::default()
            })
            .await?;
        proven.retain(|p| p.coherency_score.total < options.heal_target);
        proven.sort_by(|a, b| a.coherency_score.total.partial_cmp(&b.coherency_score.total).unwrap());
        proven.truncate(options.max_heals_per_run);

        let mut outcomes = Vec::with_capacity(proven.len());
        for pattern in proven {
            outcomes.push(self.heal_one(pattern, options).await?);
        }
        Ok(HealingReport { outcomes })
    }

    /// Heals one specific pattern regardless of its current score,
    /// bypassing the lowest-score-first selection `run_once` applies.
    pub async fn heal_pattern(&self, pattern_id: PatternId, options: HealingOptions) -> Result<HealingOutcome> {
        let pattern = self
            .store
            .get(pattern_id)
            .await?
            .ok_or_else(|| remembrance_domain::Error::not_found("pattern", pattern_id.to_string()))?;
        self.heal_one(pattern, options).await
    }

    async fn heal_one(&self, pattern: Pattern, options: HealingOptions) -> Result<HealingOutcome> {
        self.events
            .publish(DomainEvent::HealingStart { id: pattern.id })
            .await?;

        let engine = ReflectionEngine::new(&self.gate, &self.languages);
        let result = engine.heal(&pattern.code, pattern.language, options.max_loops);
        let improved = result.improvement() > 0.0;

        self.store
            .record_healing_attempt(
                pattern.id,
                improved,
                result.original_coherence.total,
                result.final_coherence.total,
                result.loops(),
            )
            .await?;

        let mut promoted = false;
        if improved {
            let whisper = result
                .steps
                .last()
                .map(|s| format!("{} improved coherency to {:.3}", s.strategy, s.coherency.total))
                .unwrap_or_default();
            let strategy = result.steps.last().map(|s| s.strategy).unwrap_or("none").to_owned();

            let variant = HealedVariant {
                id: VariantId::new(),
                parent_pattern_id: pattern.id,
                healed_code: result.code.clone(),
                original_coherency: result.original_coherence.total,
                healed_coherency: result.final_coherence.total,
                healing_loops: result.loops(),
                healing_strategy: strategy,
                whisper,
                healed_at: chrono::Utc::now(),
            };
            self.store.add_healed_variant(variant).await?;

            if result.final_coherence.total >= options.promote_threshold {
                promoted = self.try_promote(&pattern, &result.code, result.final_coherence.total, options).await?;
            }
        }

        self.events
            .publish(DomainEvent::HealingComplete {
                id: pattern.id,
                improved,
                final_coherency: result.final_coherence.total,
            })
            .await?;

        Ok(HealingOutcome {
            pattern_id: pattern.id,
            improved,
            promoted,
            before: result.original_coherence.total,
            after: result.final_coherence.total,
        })
    }

    /// Swaps `healed_code` into the pattern if the original test still
    /// passes against it in a fresh sandbox run, rolling back otherwise.
    async fn try_promote(&self, pattern: &Pattern, healed_code: &str, final_score: f64, options: HealingOptions) -> Result<bool> {
        if pattern.test_code.is_empty() {
            return Ok(false);
        }

        let outcome = self
            .sandbox
            .execute(healed_code, &pattern.test_code, pattern.language, options.sandbox_options)
            .await?;
        if !outcome.passed {
            warn!(id = %pattern.id, "healed code failed verification, keeping original");
            return Ok(false);
        }

        let scorer = remembrance_coherency::CoherencyScorer::new(&self.gate);
        let healed_score = scorer.score(healed_code, pattern.language);

        // Snapshot the pre-swap code in the audit log so a failed
        // verification has something to restore from.
        self.store
            .audit(AuditLogEntry::new(
                "heal-swap-snapshot",
                "patterns",
                pattern.id.to_string(),
                "healing-supervisor",
                pattern.code.clone(),
            ))
            .await?;

        self.store
            .update(
                pattern.id,
                PatternUpdate {
                    code: Some(healed_code.to_owned()),
                    coherency_score: Some(healed_score),
                    ..PatternUpdate::default()
                },
            )
            .await?;

        if !self.verify_or_rollback(pattern.id).await? {
            return Ok(false);
        }

        self.events
            .publish(DomainEvent::AutoPromote {
                id: pattern.id,
                variant_id: VariantId::new(),
            })
            .await?;
        info!(id = %pattern.id, score = final_score, "healed variant promoted");
        Ok(true)
    }

    /// Re-runs the stored test against the pattern's current code; on
    /// failure, restores the most recent rollback snapshot and records a
    /// failed attempt. Returns `true` if the pattern's code is left
    /// verified (no rollback was needed).
    pub async fn verify_or_rollback(&self, pattern_id: PatternId) -> Result<bool> {
        let Some(pattern) = self.store.get(pattern_id).await? else {
            return Ok(false);
        };
        if pattern.test_code.is_empty() {
            return Ok(true);
        }

        let outcome = self
            .sandbox
            .execute(&pattern.code, &pattern.test_code, pattern.language, SandboxOptions::default())
            .await?;
        if outcome.passed {
            return Ok(true);
        }

        self.rollback(pattern_id, None).await?;
        self.store
            .record_healing_attempt(pattern_id, false, pattern.coherency_score.total, pattern.coherency_score.total, 0)
            .await?;
        Ok(false)
    }

    /// Restores a pattern's code from the most recent `heal-swap-snapshot`
    /// audit entry (or leaves it unchanged if none exists), and records a
    /// rollback audit entry of its own. `version` is reserved for a future
    /// multi-snapshot history; today only the latest snapshot is kept.
    pub async fn rollback(&self, pattern_id: PatternId, _version: Option<VariantId>) -> Result<()> {
        let reason = "verification failed after healing swap".to_owned();

        let snapshot = self
            .store
            .audit_log(200)
            .await?
            .into_iter()
            .find(|entry| entry.action == "heal-swap-snapshot" && entry.record_id == pattern_id.to_string());

        if let Some(entry) = snapshot {
            self.store
                .update(
                    pattern_id,
                    PatternUpdate {
                        code: Some(entry.detail),
                        ..PatternUpdate::default()
                    },
                )
                .await?;
        }

        self.store
            .audit(AuditLogEntry::new("rollback", "patterns", pattern_id.to_string(), "healing-supervisor", reason.clone()))
            .await?;
        self.events
            .publish(DomainEvent::Rollback { id: pattern_id, reason })
            .await?;
        warn!(id = %pattern_id, "pattern rolled back after failed verification");
        Ok(())
    }

    /// `successes / attempts` for one pattern's healing history.
    pub async fn healing_rate(&self, pattern_id: PatternId) -> Result<f64> {
        Ok(self.store.healing_stats(pattern_id).await?.success_rate())
    }

    /// Healing rates for every proven pattern currently stored.
    pub async fn healing_rates(&self) -> Result<Vec<(PatternId, f64)>> {
        let proven = self
            .store
            .list(PatternFilter {
                status: Some(PatternStatus::Proven),
                ..PatternFilter::default()
            })
            .await?;

        let mut rates = Vec::with_capacity(proven.len());
        for pattern in proven {
            rates.push((pattern.id, self.healing_rate(pattern.id).await?));
        }
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_domain::value_objects::{CoherencyScore, Language};
    use remembrance_events::NullEventBus;
    use remembrance_store::SqliteStore;

    async fn supervisor_and_store() -> (HealingSupervisor, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let supervisor = HealingSupervisor::new(
            Arc::new(SafetyGate::with_defaults()),
            Arc::new(LanguageRegistry::new()),
            Arc::new(Sandbox::with_defaults()),
            store.clone(),
            Arc::new(NullEventBus),
        );
        (supervisor, store)
    }

    fn messy_pattern() -> Pattern {
        Pattern {
            id: PatternId::new(),
            name: "messy".to_owned(),
            language: Language::Rust,
            code: "fn add(a: i32, b: i32) -> i32 {   \n\n\n\n    a + b\n}   \n".to_owned(),
            test_code: String::new(),
            description: "adds two numbers".to_owned(),
            tags: Vec::new(),
            pattern_type: "function".to_owned(),
            complexity: "trivial".to_owned(),
            coherency_score: CoherencyScore::new(0.5, 0.5, 0.5, 0.5, 0.5),
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
    async fn run_once_skips_patterns_already_at_target() {
        let (supervisor, store) = supervisor_and_store().await;
        let mut pattern = messy_pattern();
        pattern.coherency_score = CoherencyScore::new(0.95, 0.95, 0.95, 0.95, 0.95);
        store.insert(pattern).await.unwrap();

        let report = supervisor
            .run_once(HealingOptions {
                max_heals_per_run: 20,
                max_loops: 3,
                heal_target: 0.85,
                promote_threshold: 0.9,
                sandbox_options: SandboxOptions::default(),
            })
            .await
            .unwrap();
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn run_once_records_attempt_for_low_scoring_pattern() {
        let (supervisor, store) = supervisor_and_store().await;
        let stored = store.insert(messy_pattern()).await.unwrap();

        let report = supervisor
            .run_once(HealingOptions {
                max_heals_per_run: 20,
                max_loops: 3,
                heal_target: 0.85,
                promote_threshold: 0.9,
                sandbox_options: SandboxOptions::default(),
            })
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].pattern_id, stored.id);
        let stats = store.healing_stats(stored.id).await.unwrap();
        assert_eq!(stats.attempts, 1);
    }
}
