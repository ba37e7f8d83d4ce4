//! Component H: turns a raw submission into a stored pattern or a typed
//! rejection, in the five steps laid out for `submit()`.

use std::sync::Arc;

use remembrance_coherency::CoherencyScorer;
use remembrance_domain::entities::{Pattern, PatternStatus};
use remembrance_domain::events::DomainEvent;
use remembrance_domain::ports::events::EventBus;
use remembrance_domain::ports::store::{PatternFilter, PatternStorePort};
use remembrance_domain::value_objects::{CoherencyScore, Language, PatternId, Tier};
use remembrance_domain::{Error, Result};
use remembrance_safety::{CheckOutcome, SafetyGate, Violation};
use remembrance_sandbox::{Sandbox, SandboxOptions};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Everything a caller supplies alongside the code itself.
#[derive(Debug, Clone, Default)]
pub struct SubmissionMetadata {
    /// Human label; uniqueness among proven patterns is enforced by the
    /// store.
    pub name: String,
    /// Declared test code. Absent submissions are stored as candidates
    /// and never promoted to proven without one.
    pub test_code: Option<String>,
    /// Free-text description consumed by the Ranker.
    pub description: String,
    /// Tag set.
    pub tags: Vec<String>,
    /// Coarse classification, e.g. `"algorithm"`.
    pub pattern_type: String,
    /// Self-reported complexity label.
    pub complexity: String,
    /// Author tag.
    pub author: String,
    /// Explicit parent, when this submission is a deliberate evolution.
    pub parent_pattern_id: Option<PatternId>,
}

/// Why a submission did not reach `proven`.
#[derive(Debug, Clone)]
pub enum RejectionReason {
    /// The safety gate vetoed the code outright.
    Safety(Vec<Violation>),
    /// The declared test failed to pass in the sandbox.
    Test { output: String, duration_ms: u64 },
    /// Coherency fell below the configured admission threshold.
    Coherency { score: f64, threshold: f64 },
}

/// Outcome of `AdmissionPipeline::submit`.
#[derive(Debug, Clone)]
pub enum AdmissionResult {
    /// Stored as `proven`: safety passed, the test passed, and coherency
    /// cleared the threshold.
    Accepted(Pattern),
    /// Stored as `candidate`: coherency cleared the threshold but no
    /// test was supplied, or safety/coherency fell short.
    Candidate(Pattern),
    /// Rejected outright; nothing was written.
    Rejected(RejectionReason),
    /// `(name, language, hash(code))` matched an existing pattern.
    Duplicate { existing_id: PatternId },
}

/// Runs raw submissions through safety, sandboxing, and coherency
/// scoring before they reach the store.
pub struct AdmissionPipeline {
    gate: Arc<SafetyGate>,
    sandbox: Arc<Sandbox>,
    store: Arc<dyn PatternStorePort>,
    events: Arc<dyn EventBus>,
    admission_threshold: f64,
    sandbox_options: SandboxOptions,
}

impl AdmissionPipeline {
    /// Builds a pipeline wired to the given ports and threshold.
    #[must_use]
    pub fn new(
        gate: Arc<SafetyGate>,
        sandbox: Arc<Sandbox>,
        store: Arc<dyn PatternStorePort>,
        events: Arc<dyn EventBus>,
        admission_threshold: f64,
        sandbox_options: SandboxOptions,
    ) -> Self {
        Self {
            gate,
            sandbox,
            store,
            events,
            admission_threshold,
            sandbox_options,
        }
    }

    /// Runs the five-step admission flow (spec §4.H):
    /// 1. idempotency check by `(name, language, hash(code))`
    /// 2. safety gate
    /// 3. sandbox test run, if test code was supplied
    /// 4. coherency scoring
    /// 5. store write, `proven` or `candidate` depending on the above
    pub async fn submit(&self, code: &str, language: Language, metadata: SubmissionMetadata) -> Result<AdmissionResult> {
        if let Some(existing) = self.find_duplicate(code, language, &metadata.name).await? {
            return Ok(AdmissionResult::Duplicate { existing_id: existing });
        }

        if let CheckOutcome::Violations(violations) = self.gate.check(code) {
            if violations.iter().any(|v| v.vetoes) {
                self.events
                    .publish(DomainEvent::SecurityVeto {
                        principle: violations[0].principle.clone(),
                    })
                    .await?;
                return Ok(AdmissionResult::Rejected(RejectionReason::Safety(violations)));
            }
        }

        let (test_passed, test_rejection) = match &metadata.test_code {
            Some(test_code) => {
                let outcome = self.sandbox.execute(code, test_code, language, self.sandbox_options).await?;
                if outcome.passed {
                    (true, None)
                } else {
                    (
                        false,
                        Some(RejectionReason::Test {
                            output: outcome.output,
                            duration_ms: outcome.duration_ms,
                        }),
                    )
                }
            }
            None => (false, None),
        };

        let scorer = CoherencyScorer::new(&self.gate);
        let coherency_score = scorer.score(code, language);

        let pattern = self.build_pattern(code, language, &metadata, coherency_score, test_passed);

        if coherency_score.total < self.admission_threshold {
            return Ok(AdmissionResult::Rejected(RejectionReason::Coherency {
                score: coherency_score.total,
                threshold: self.admission_threshold,
            }));
        }

        if let Some(rejection) = test_rejection {
            let stored = self.insert(pattern).await?;
            debug!(id = %stored.id, "submission stored as candidate after failing test");
            let _ = rejection;
            return Ok(AdmissionResult::Candidate(stored));
        }

        let stored = self.insert(pattern).await?;
        if stored.status == PatternStatus::Proven {
            self.events
                .publish(DomainEvent::PatternAdded {
                    id: stored.id,
                    tier: Tier::Local,
                })
                .await?;
            info!(id = %stored.id, name = %stored.name, "pattern admitted as proven");
            Ok(AdmissionResult::Accepted(stored))
        } else {
            Ok(AdmissionResult::Candidate(stored))
        }
    }

    fn build_pattern(
        &self,
        code: &str,
        language: Language,
        metadata: &SubmissionMetadata,
        coherency_score: CoherencyScore,
        test_passed: bool,
    ) -> Pattern {
        let status = if test_passed && coherency_score.total >= self.admission_threshold {
            PatternStatus::Proven
        } else {
            PatternStatus::Candidate
        };

        Pattern {
            id: PatternId::new(),
            name: metadata.name.clone(),
            language,
            code: code.to_owned(),
            test_code: metadata.test_code.clone().unwrap_or_default(),
            description: metadata.description.clone(),
            tags: metadata.tags.clone(),
            pattern_type: metadata.pattern_type.clone(),
            complexity: metadata.complexity.clone(),
            coherency_score,
            test_passed,
            author: metadata.author.clone(),
            usage_count: 0,
            success_count: 0,
            last_used: None,
            created_at: chrono_now(),
            parent_pattern_id: metadata.parent_pattern_id,
            evolution_history: Vec::new(),
            status,
        }
    }

    async fn insert(&self, pattern: Pattern) -> Result<Pattern> {
        match self.store.insert(pattern).await {
            Ok(stored) => Ok(stored),
            Err(Error::DuplicateName { existing_id }) => self
                .store
                .get(existing_id)
                .await?
                .ok_or_else(|| Error::not_found("pattern", existing_id.to_string())),
            Err(other) => Err(other),
        }
    }

    async fn find_duplicate(&self, code: &str, language: Language, name: &str) -> Result<Option<PatternId>> {
        let hash = hash_code(code);
        let filter = PatternFilter {
            language: Some(language),
            ..PatternFilter::default()
        };
        let candidates = self.store.list(filter).await?;
        Ok(candidates
            .into_iter()
            .find(|p| p.name == name && hash_code(&p.code) == hash)
            .map(|p| p.id))
    }
}

fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

fn chrono_now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_events::NullEventBus;
    use remembrance_store::SqliteStore;

    async fn pipeline() -> AdmissionPipeline {
        let store = SqliteStore::in_memory().await.expect("in-memory store");
        AdmissionPipeline::new(
            Arc::new(SafetyGate::with_defaults()),
            Arc::new(Sandbox::with_defaults()),
            Arc::new(store),
            Arc::new(NullEventBus),
            0.6,
            SandboxOptions::default(),
        )
    }

    fn metadata(name: &str) -> SubmissionMetadata {
        SubmissionMetadata {
            name: name.to_owned(),
            test_code: None,
            description: "adds two numbers".to_owned(),
            tags: vec!["math".to_owned()],
            pattern_type: "function".to_owned(),
            complexity: "trivial".to_owned(),
            author: "tester".to_owned(),
            parent_pattern_id: None,
        }
    }

    #[tokio::test]
    async fn clean_code_without_test_becomes_candidate() {
        let pipeline = pipeline().await;
        let code = "fn add(a: i32, b: i32) -> i32 { a + b }";
        let result = pipeline.submit(code, Language::Rust, metadata("add")).await.unwrap();
        match result {
            AdmissionResult::Candidate(p) => assert_eq!(p.status, PatternStatus::Candidate),
            other => panic!("expected candidate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn identical_resubmission_is_flagged_duplicate() {
        let pipeline = pipeline().await;
        let code = "fn add(a: i32, b: i32) -> i32 { a + b }";
        let first = pipeline.submit(code, Language::Rust, metadata("add")).await.unwrap();
        let first_id = match first {
            AdmissionResult::Candidate(p) => p.id,
            other => panic!("expected candidate, got {other:?}"),
        };
        let second = pipeline.submit(code, Language::Rust, metadata("add")).await.unwrap();
        match second {
            AdmissionResult::Duplicate { existing_id } => assert_eq!(existing_id, first_id),
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dangerous_code_is_rejected_on_safety() {
        let pipeline = pipeline().await;
        let code = "fn run(x: &str) { eval(x); }";
        let result = pipeline.submit(code, Language::JavaScript, metadata("run")).await.unwrap();
        match result {
            AdmissionResult::Rejected(RejectionReason::Safety(_)) => {}
            AdmissionResult::Rejected(RejectionReason::Coherency { .. }) => {}
            other => panic!("expected a rejection, got {other:?}"),
        }
    }
}
