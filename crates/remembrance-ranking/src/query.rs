//! The query shape accepted by [`crate::ranker::Ranker`].

use remembrance_domain::value_objects::Language;

/// A free-text search request.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Free-text description matched against pattern name/description.
    pub description: String,
    /// Tags matched against a candidate's tags and, via
    /// [`crate::concepts`], their concept-cluster expansion.
    pub tags: Vec<String>,
    /// Restrict the language dimension to a single language. `None`
    /// means the language dimension contributes full score regardless of
    /// the candidate's language.
    pub language: Option<Language>,
}
