//! Error-to-fix records, keyed by a normalized error fingerprint.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::value_objects::{DebugPatternId, Language};

/// Coarse category of a captured error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugCategory {
    /// Parser/grammar failure.
    Syntax,
    /// Type checker failure.
    Type,
    /// Undefined name/import failure.
    Reference,
    /// Wrong-but-compiling behavior.
    Logic,
    /// Failure observed only at runtime.
    Runtime,
    /// Build/link/toolchain failure.
    Build,
    /// Network call failure.
    Network,
    /// Filesystem/permission failure.
    Permission,
    /// Async/concurrency failure.
    Async,
    /// Malformed or unexpected data.
    Data,
}

/// An error→fix record. Identity is the fingerprint of the normalized
/// error message combined with `category` and the extracted error class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugPattern {
    /// Opaque identity, distinct from the fingerprint (see
    /// [`fingerprint`]); lets callers reference a specific row even if two
    /// records end up colliding during a migration.
    pub id: DebugPatternId,
    /// Stable fingerprint of `(normalized error, error_class, category)`.
    pub fingerprint: String,
    /// Raw captured error message.
    pub error_message: String,
    /// Optional captured stack trace.
    pub stack_trace: Option<String>,
    /// Source that is believed to fix the error.
    pub fix_code: String,
    /// Language the fix applies to.
    pub language: Language,
    /// Coarse category.
    pub category: DebugCategory,
    /// Confidence in `[0, 1]`, from the sigmoid in `CoherencyScorer`.
    pub confidence: f64,
    /// Times this fix was offered to a caller.
    pub times_applied: u64,
    /// Times the caller reported the fix resolved the error.
    pub times_resolved: u64,
}

/// Normalize an error message for fingerprinting: strip file paths, line
/// numbers, memory addresses and timestamps, then collapse whitespace.
#[must_use]
pub fn normalize_error_message(raw: &str) -> String {
    let path_stripped = PATH_RE.replace_all(raw, "<path>");
    let line_stripped = LINE_RE.replace_all(&path_stripped, "<loc>");
    let addr_stripped = ADDR_RE.replace_all(&line_stripped, "<addr>");
    let ts_stripped = TIMESTAMP_RE.replace_all(&addr_stripped, "<ts>");
    ts_stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute the stable fingerprint identifying a [`DebugPattern`].
#[must_use]
pub fn fingerprint(raw_message: &str, error_class: &str, category: DebugCategory) -> String {
    let normalized = normalize_error_message(raw_message);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hasher.update(b"\0");
    hasher.update(error_class.as_bytes());
    hasher.update(b"\0");
    hasher.update(format!("{category:?}").as_bytes());
    hex::encode(hasher.finalize())
}

use once_cell::sync::Lazy;
use regex::Regex;

static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[A-Za-z]:)?[/\\][\w./\\-]+").expect("valid regex"));
static LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bline\s+\d+\b|:\d+:\d+\b").expect("valid regex"));
static ADDR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"0x[0-9a-fA-F]+").expect("valid regex"));
static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?")
        .expect("valid regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_paths_lines_addresses_and_timestamps() {
        let raw = "panic at /home/user/src/main.rs:42:9 addr=0x7ffeead1 at 2024-01-02T03:04:05Z";
        let normalized = normalize_error_message(raw);
        assert!(!normalized.contains("/home"));
        assert!(!normalized.contains("42:9"));
        assert!(!normalized.contains("0x7ffeead1"));
        assert!(!normalized.contains("2024-01-02"));
    }

    #[test]
    fn fingerprint_is_stable_across_volatile_details() {
        let a = fingerprint(
            "panic at /a/b.rs:1:1 at 2024-01-01T00:00:00Z",
            "PanicError",
            DebugCategory::Runtime,
        );
        let b = fingerprint(
            "panic at /c/d.rs:99:9 at 2025-06-06T12:00:00Z",
            "PanicError",
            DebugCategory::Runtime,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn different_category_changes_fingerprint() {
        let a = fingerprint("boom", "E", DebugCategory::Runtime);
        let b = fingerprint("boom", "E", DebugCategory::Logic);
        assert_ne!(a, b);
    }
}
