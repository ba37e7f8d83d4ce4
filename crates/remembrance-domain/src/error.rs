//! Error taxonomy shared by every component of the pattern memory.

use thiserror::Error;

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Tagged error variants. Names are semantic, never language-specific,
/// matching the taxonomy in the system specification.
#[derive(Error, Debug)]
pub enum Error {
    /// A [`crate::ports::safety::SafetyPrinciple`] match vetoed the submission.
    #[error("safety violation: principle '{principle}' ({reason})")]
    SafetyViolation {
        /// Name of the violated principle.
        principle: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The declared test code failed against the candidate code.
    #[error("test failed after {duration_ms}ms: {output}")]
    TestFailed {
        /// Captured sandbox output (truncated).
        output: String,
        /// Wall-clock duration of the sandbox run.
        duration_ms: u64,
    },

    /// Coherency score fell below the configured admission threshold.
    #[error("coherency {score:.3} below threshold {threshold:.3}")]
    CoherencyTooLow {
        /// Achieved total coherency score.
        score: f64,
        /// Required minimum.
        threshold: f64,
    },

    /// `(name, language)` already exists in the store.
    #[error("duplicate pattern name, existing id {existing_id}")]
    DuplicateName {
        /// Identifier of the pattern already on file.
        existing_id: uuid::Uuid,
    },

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity (`"pattern"`, `"variant"`, ...).
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The supplied language string is not a recognised member of the
    /// closed language set.
    #[error("invalid language: {name}")]
    InvalidLanguage {
        /// The unrecognised language name.
        name: String,
    },

    /// The supplied string is not a valid identifier.
    #[error("invalid identifier: {value}")]
    InvalidId {
        /// The unparsable value.
        value: String,
    },

    /// No sandbox runner is registered for the requested language.
    #[error("no sandbox runner registered for {language}")]
    NoRunner {
        /// The language with no runner.
        language: String,
    },

    /// An operation exceeded its deadline.
    #[error("{operation} timed out after {limit_ms}ms")]
    Timeout {
        /// Name of the operation that timed out.
        operation: String,
        /// Configured limit in milliseconds.
        limit_ms: u64,
    },

    /// Caller requested cancellation before completion.
    #[error("operation cancelled")]
    Cancelled,

    /// Filesystem or persistence I/O failed.
    #[error("io failure at {path}: {kind}")]
    IoFailure {
        /// Path the failure occurred on.
        path: String,
        /// Short description of the OS error kind.
        kind: String,
    },

    /// A pluggable capability (e.g. [`crate::ports::assistant::ExternalAssistant`])
    /// is not configured.
    #[error("dependency unavailable: {name}")]
    DependencyUnavailable {
        /// Name of the missing capability.
        name: String,
    },

    /// The worker pool's bounded queue is full.
    #[error("overloaded: {context}")]
    Overloaded {
        /// Where the overload was observed.
        context: String,
    },

    /// Underlying SQL persistence error, wrapped for callers that only
    /// care about the taxonomy above.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the failure.
        message: String,
        /// Original error, if one is available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bug bucket. Always logged with full context; never expected in
    /// normal operation.
    #[error("internal error: {context}")]
    Internal {
        /// Free-form debugging context.
        context: String,
    },
}

impl Error {
    /// Build a [`Error::Storage`] from any boxable source error.
    pub fn storage(message: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a [`Error::Storage`] without a source error.
    pub fn storage_msg(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`Error::NotFound`] for the given entity kind.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
