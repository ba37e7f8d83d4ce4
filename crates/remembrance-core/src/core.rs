//! Wires every component behind the thirteen public operations in spec
//! §6. `Core` owns no mutable state of its own beyond the worker pool's
//! bookkeeping; `PatternStore` remains the only component with mutable
//! persistent state (spec §5's shared-resource policy).

use std::sync::Arc;

use remembrance_domain::entities::debug_pattern::{fingerprint, normalize_error_message};
use remembrance_domain::entities::{DebugCategory, DebugPattern, Pattern};
use remembrance_domain::ports::assistant::ExternalAssistant;
use remembrance_domain::ports::events::EventBus;
use remembrance_domain::ports::store::{PatternFilter, PatternStorePort, StoreSummary};
use remembrance_domain::value_objects::{DebugPatternId, Language, PatternId};
use remembrance_domain::Result;
use remembrance_federation::{federated_search, FederationSource, MergedResults};
use remembrance_language::LanguageRegistry;
use remembrance_ranking::{rank, resolve, Query, ResolveResult, ScoredPattern};
use remembrance_reflection::ReflectionEngine;
use remembrance_safety::SafetyGate;
use remembrance_sandbox::Sandbox;

use crate::config::RemembranceConfig;
use crate::healing::{HealingOptions, HealingReport, HealingSupervisor};
use crate::pipeline::{AdmissionPipeline, AdmissionResult, SubmissionMetadata};
use crate::workers::WorkerPool;

/// Result of `feedback()`.
#[derive(Debug, Clone)]
pub struct ReliabilityUpdate {
    /// Pattern the feedback applied to.
    pub pattern_id: PatternId,
    /// Usage count after recording this feedback.
    pub usage_count: u64,
    /// Success count after recording this feedback.
    pub success_count: u64,
    /// `successCount / usageCount`.
    pub reliability: f64,
}

/// Result of `debugCapture()`.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// The stored (or already-existing) debug pattern.
    pub pattern: DebugPattern,
    /// `true` if this call created a new row rather than matching an
    /// existing fingerprint.
    pub created: bool,
}

/// Result of `debugFeedback()`.
#[derive(Debug, Clone)]
pub struct ConfidenceUpdate {
    /// Debug pattern the feedback applied to.
    pub id: DebugPatternId,
    /// Confidence after folding in this feedback.
    pub confidence: f64,
}

/// Either an existing pattern or raw code to heal ad hoc.
#[derive(Debug, Clone)]
pub enum HealTarget {
    /// Heal a specific stored pattern in place.
    Pattern(PatternId),
    /// Heal a loose snippet without touching the store.
    Code { code: String, language: Language },
}

/// The assembled system: every component wired to the ports it needs,
/// behind the public operation surface.
pub struct Core {
    config: RemembranceConfig,
    gate: Arc<SafetyGate>,
    languages: Arc<LanguageRegistry>,
    store: Arc<dyn PatternStorePort>,
    events: Arc<dyn EventBus>,
    assistant: Arc<dyn ExternalAssistant>,
    pipeline: AdmissionPipeline,
    healing: HealingSupervisor,
    federation_sources: Vec<Box<dyn FederationSource>>,
    workers: WorkerPool,
}

impl Core {
    /// Assembles a running instance from its ports and configuration.
    /// `federation_sources` should include a `LocalSource` wrapping
    /// `store` if local results belong in `federatedSearch`'s fan-out;
    /// `query`/`resolve` always consult the local store directly and do
    /// not depend on this list.
    #[must_use]
    pub fn new(
        config: RemembranceConfig,
        gate: Arc<SafetyGate>,
        languages: Arc<LanguageRegistry>,
        sandbox: Arc<Sandbox>,
        store: Arc<dyn PatternStorePort>,
        events: Arc<dyn EventBus>,
        assistant: Arc<dyn ExternalAssistant>,
        federation_sources: Vec<Box<dyn FederationSource>>,
    ) -> Self {
        let pipeline = AdmissionPipeline::new(
            gate.clone(),
            sandbox.clone(),
            store.clone(),
            events.clone(),
            config.admission_threshold,
            Default::default(),
        );
        let healing = HealingSupervisor::new(gate.clone(), languages.clone(), sandbox, store.clone(), events.clone());
        let workers = WorkerPool::new(config.worker_pool_size);

        Self {
            config,
            gate,
            languages,
            store,
            events,
            assistant,
            pipeline,
            healing,
            federation_sources,
            workers,
        }
    }

    /// `submit(code, metadata) -> AdmissionResult`.
    pub async fn submit(&self, code: String, language: Language, metadata: SubmissionMetadata) -> Result<AdmissionResult> {
        let pipeline = &self.pipeline;
        self.workers
            .run("submit", || async move { pipeline.submit(&code, language, metadata).await })
            .await
    }

    /// `query(request) -> [RankedResult]`, consulting the local store
    /// only. Use `federatedSearch` to fan out across tiers.
    pub async fn query(&self, query: Query, limit: usize) -> Result<Vec<ScoredPattern>> {
        let patterns = self.local_candidates(&query).await?;
        let mut scored = rank(&query, patterns);
        scored.truncate(limit);
        Ok(scored)
    }

    /// `resolve(request) -> ResolveResult`.
    pub async fn resolve(&self, query: Query) -> Result<ResolveResult> {
        let patterns = self.local_candidates(&query).await?;
        let ranked = rank(&query, patterns);
        Ok(resolve(&ranked))
    }

    /// `feedback(patternId, succeeded) -> ReliabilityUpdate`.
    pub async fn feedback(&self, pattern_id: PatternId, succeeded: bool) -> Result<ReliabilityUpdate> {
        let pattern = self.store.record_usage(pattern_id, succeeded).await?;
        self.events
            .publish(remembrance_domain::events::DomainEvent::Feedback {
                id: pattern_id,
                succeeded,
            })
            .await?;
        Ok(ReliabilityUpdate {
            pattern_id,
            usage_count: pattern.usage_count,
            success_count: pattern.success_count,
            reliability: pattern.reliability(),
        })
    }

    /// `inspect(patternId) -> Pattern?`.
    pub async fn inspect(&self, pattern_id: PatternId) -> Result<Option<Pattern>> {
        self.store.get(pattern_id).await
    }

    /// A short natural-language explanation of a pattern's code, via the
    /// configured `ExternalAssistant`. `None` whenever no assistant is
    /// configured (the default `NoopAssistant`) or it has no opinion.
    pub async fn explain(&self, pattern_id: PatternId) -> Result<Option<String>> {
        let Some(pattern) = self.store.get(pattern_id).await? else {
            return Ok(None);
        };
        Ok(self.assistant.explain(&pattern.code, pattern.language).await)
    }

    /// `stats() -> StoreSummary`.
    pub async fn stats(&self) -> Result<StoreSummary> {
        self.store.summary().await
    }

    /// `registerPattern(pattern) -> AdmissionResult`: runs a fully-formed
    /// pattern through the same admission flow as `submit`, so a directly
    /// constructed record is still safety-checked, sandboxed, and scored
    /// rather than written verbatim.
    pub async fn register_pattern(&self, pattern: Pattern) -> Result<AdmissionResult> {
        let metadata = SubmissionMetadata {
            name: pattern.name,
            test_code: (!pattern.test_code.is_empty()).then_some(pattern.test_code),
            description: pattern.description,
            tags: pattern.tags,
            pattern_type: pattern.pattern_type,
            complexity: pattern.complexity,
            author: pattern.author,
            parent_pattern_id: pattern.parent_pattern_id,
        };
        self.submit(pattern.code, pattern.language, metadata).await
    }

    /// `evolvePattern(parentId, newCode, metadata) -> AdmissionResult`.
    pub async fn evolve_pattern(&self, parent_id: PatternId, new_code: String, mut metadata: SubmissionMetadata) -> Result<AdmissionResult> {
        let parent = self
            .store
            .get(parent_id)
            .await?
            .ok_or_else(|| remembrance_domain::Error::not_found("pattern", parent_id.to_string()))?;
        metadata.parent_pattern_id = Some(parent_id);
        self.submit(new_code, parent.language, metadata).await
    }

    /// `heal(patternId | code) -> HealingReport`.
    pub async fn heal(&self, target: HealTarget) -> Result<HealingReport> {
        match target {
            HealTarget::Pattern(id) => {
                let healing = &self.healing;
                let options = self.healing_options();
                self.workers
                    .run("heal", || async move { Ok(HealingReport { outcomes: vec![healing.heal_pattern(id, options).await?] }) })
                    .await
            }
            HealTarget::Code { code, language } => {
                let engine = ReflectionEngine::new(&self.gate, &self.languages);
                let result = engine.heal(&code, language, self.config.max_heal_loops);
                Ok(HealingReport {
                    outcomes: vec![crate::healing::HealingOutcome {
                        pattern_id: PatternId::new(),
                        improved: result.improvement() > 0.0,
                        promoted: false,
                        before: result.original_coherence.total,
                        after: result.final_coherence.total,
                    }],
                })
            }
        }
    }

    /// Runs the periodic healing pass described in spec §4.I over every
    /// eligible proven pattern.
    pub async fn run_healing_pass(&self) -> Result<HealingReport> {
        let healing = &self.healing;
        let options = self.healing_options();
        self.workers.run("healing-pass", || async move { healing.run_once(options).await }).await
    }

    /// `federatedSearch(query) -> MergedResults`.
    pub async fn federated_search(&self, query: Query, limit: usize) -> Result<MergedResults> {
        Ok(federated_search(&self.federation_sources, &query, limit).await)
    }

    /// `debugCapture(errorMessage, stackTrace?, fixCode, language) -> CaptureResult`.
    pub async fn debug_capture(
        &self,
        error_message: String,
        stack_trace: Option<String>,
        fix_code: String,
        language: Language,
    ) -> Result<CaptureResult> {
        let category = classify_error(&error_message);
        let error_class = error_message.split(':').next().unwrap_or("Error").trim().to_owned();
        let fp = fingerprint(&error_message, &error_class, category);

        let candidate = DebugPattern {
            id: DebugPatternId::new(),
            fingerprint: fp.clone(),
            error_message,
            stack_trace,
            fix_code,
            language,
            category,
            confidence: remembrance_coherency::confidence(0, 0),
            times_applied: 0,
            times_resolved: 0,
        };

        let existing_id = candidate.id;
        let stored = self.store.upsert_debug_pattern(candidate).await?;
        let created = stored.id == existing_id;
        Ok(CaptureResult { pattern: stored, created })
    }

    /// `debugSearch(errorMessage, stackTrace?, language?) -> [DebugPattern]`.
    pub async fn debug_search(&self, error_message: &str, language: Option<Language>) -> Result<Vec<DebugPattern>> {
        let normalized = normalize_error_message(error_message);
        let prefix: String = normalized.chars().take(32).collect();
        self.store.find_debug_patterns(language, None, &prefix).await
    }

    /// `debugFeedback(id, resolved) -> ConfidenceUpdate`.
    pub async fn debug_feedback(&self, id: DebugPatternId, resolved: bool) -> Result<ConfidenceUpdate> {
        let pattern = self.store.record_debug_feedback(id, resolved).await?;
        Ok(ConfidenceUpdate {
            id,
            confidence: pattern.confidence,
        })
    }

    async fn local_candidates(&self, query: &Query) -> Result<Vec<(Pattern, remembrance_domain::entities::HealingStats)>> {
        let filter = PatternFilter {
            language: query.language,
            min_coherency: Some(remembrance_domain::constants::DEFAULT_QUERY_MIN_COHERENCY),
            ..PatternFilter::default()
        };
        let patterns = self.store.list(filter).await?;
        let mut pairs = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let stats = self.store.healing_stats(pattern.id).await?;
            pairs.push((pattern, stats));
        }
        Ok(pairs)
    }

    fn healing_options(&self) -> HealingOptions {
        HealingOptions {
            max_heals_per_run: self.config.max_heals_per_run,
            max_loops: self.config.max_heal_loops,
            heal_target: self.config.heal_target,
            promote_threshold: self.config.promote_threshold,
            sandbox_options: Default::default(),
        }
    }
}

fn classify_error(message: &str) -> DebugCategory {
    let lower = message.to_lowercase();
    if lower.contains("syntax") || lower.contains("unexpected token") {
        DebugCategory::Syntax
    } else if lower.contains("type") || lower.contains("mismatched types") {
        DebugCategory::Type
    } else if lower.contains("not found") || lower.contains("undefined") || lower.contains("unresolved") {
        DebugCategory::Reference
    } else if lower.contains("timeout") || lower.contains("timed out") {
        DebugCategory::Async
    } else if lower.contains("permission denied") || lower.contains("access denied") {
        DebugCategory::Permission
    } else if lower.contains("connection") || lower.contains("network") || lower.contains("dns") {
        DebugCategory::Network
    } else if lower.contains("panic") || lower.contains("exception") {
        DebugCategory::Runtime
    } else if lower.contains("json") || lower.contains("parse") || lower.contains("deserialize") {
        DebugCategory::Data
    } else if lower.contains("linker") || lower.contains("compile") || lower.contains("build failed") {
        DebugCategory::Build
    } else {
        DebugCategory::Logic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_assistant::NoopAssistant;
    use remembrance_events::NullEventBus;
    use remembrance_store::SqliteStore;

    async fn core() -> Core {
        let store: Arc<dyn PatternStorePort> = Arc::new(SqliteStore::in_memory().await.unwrap());
        Core::new(
            RemembranceConfig::default(),
            Arc::new(SafetyGate::with_defaults()),
            Arc::new(LanguageRegistry::new()),
            Arc::new(Sandbox::with_defaults()),
            store,
            Arc::new(NullEventBus),
            Arc::new(NoopAssistant),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn submit_then_inspect_round_trips() {
        let core = core().await;
        let result = core
            .submit(
                "fn add(a: i32, b: i32) -> i32 { a + b }".to_owned(),
                Language::Rust,
                SubmissionMetadata {
                    name: "add".to_owned(),
                    test_code: None,
                    description: "adds two numbers".to_owned(),
                    tags: vec!["math".to_owned()],
                    pattern_type: "function".to_owned(),
                    complexity: "trivial".to_owned(),
                    author: "tester".to_owned(),
                    parent_pattern_id: None,
                },
            )
            .await
            .unwrap();

        let id = match result {
            AdmissionResult::Candidate(p) | AdmissionResult::Accepted(p) => p.id,
            other => panic!("unexpected result: {other:?}"),
        };
        let fetched = core.inspect(id).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn stats_reflects_submitted_pattern() {
        let core = core().await;
        core.submit(
            "fn add(a: i32, b: i32) -> i32 { a + b }".to_owned(),
            Language::Rust,
            SubmissionMetadata {
                name: "add".to_owned(),
                test_code: None,
                description: String::new(),
                tags: Vec::new(),
                pattern_type: "function".to_owned(),
                complexity: "trivial".to_owned(),
                author: "tester".to_owned(),
                parent_pattern_id: None,
            },
        )
        .await
        .unwrap();

        let summary = core.stats().await.unwrap();
        assert_eq!(summary.total_patterns, 1);
    }

    #[tokio::test]
    async fn debug_capture_then_search_finds_it() {
        let core = core().await;
        core.debug_capture(
            "panic at /a/b.rs:1:1: index out of bounds".to_owned(),
            None,
            "bounds-check the index".to_owned(),
            Language::Rust,
        )
        .await
        .unwrap();

        let found = core.debug_search("panic at /x/y.rs:2:2: index out of bounds", Some(Language::Rust)).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn classify_error_recognises_common_categories() {
        assert!(matches!(classify_error("SyntaxError: unexpected token"), DebugCategory::Syntax));
        assert!(matches!(classify_error("connection refused"), DebugCategory::Network));
        assert!(matches!(classify_error("something obscure happened"), DebugCategory::Logic));
    }
}
