//! The `ExternalAssistant` capability: an optional, pluggable language
//! model bridge. Every method returns `Option<T>` — `None` means "no
//! opinion" and must never be treated as failure by a caller. The
//! default adapter (`NoopAssistant`, in `remembrance-assistant`) returns
//! `None` from every method, so the system is fully functional with no
//! assistant configured at all.

use async_trait::async_trait;

use crate::value_objects::Language;

/// A request to rewrite code from one language to another, preserving
/// behavior.
#[derive(Debug, Clone)]
pub struct TranspileRequest {
    /// Source code to rewrite.
    pub code: String,
    /// Language the code is currently written in.
    pub from: Language,
    /// Language to rewrite it into.
    pub to: Language,
}

/// A request to propose test code exercising a pattern's behavior.
#[derive(Debug, Clone)]
pub struct GenerateTestsRequest {
    /// Code under test.
    pub code: String,
    /// Language of `code`.
    pub language: Language,
    /// Free-form description of intended behavior, if known.
    pub description: Option<String>,
}

/// A request to propose a refinement of a low-scoring or failing
/// candidate.
#[derive(Debug, Clone)]
pub struct RefineRequest {
    /// Code to refine.
    pub code: String,
    /// Language of `code`.
    pub language: Language,
    /// Why the code needs refinement (failing test output, low
    /// dimension scores, ...).
    pub reason: String,
}

/// A request to generate a new pattern from scratch, used by the
/// `Resolver`'s `GENERATE` path when no existing pattern qualifies.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Natural-language description of the desired behavior.
    pub description: String,
    /// Target language.
    pub language: Language,
}

/// Pluggable, optional capability for language-model assisted steps.
/// None of these calls sit on any invariant-enforcing path: a `None`
/// response simply means the caller falls back to its own deterministic
/// strategy.
#[async_trait]
pub trait ExternalAssistant: Send + Sync {
    /// Attempt to transpile code between languages.
    async fn transpile(&self, request: TranspileRequest) -> Option<String>;

    /// Attempt to generate test code for a pattern.
    async fn generate_tests(&self, request: GenerateTestsRequest) -> Option<String>;

    /// Attempt to refine code that failed verification or scored low.
    async fn refine(&self, request: RefineRequest) -> Option<String>;

    /// Attempt to generate a brand-new implementation from a
    /// description.
    async fn generate_alternative(&self, request: GenerateRequest) -> Option<String>;

    /// Attempt a short natural-language explanation of a pattern, used
    /// by `inspect()`.
    async fn explain(&self, code: &str, language: Language) -> Option<String>;
}
