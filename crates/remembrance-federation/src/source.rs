//! One queryable tier. `local`/`personal`/`community` are backed by a
//! `PatternStorePort`-shaped in-process search closure; a `remote` tier
//! is an HTTP client hitting another instance's `/api/search`.

use async_trait::async_trait;
use remembrance_domain::entities::Pattern;
use remembrance_domain::value_objects::Tier;
use remembrance_domain::{Error, Result};
use remembrance_ranking::Query;

/// A single federated search source.
#[async_trait]
pub trait FederationSource: Send + Sync {
    /// Which tier this source represents.
    fn tier(&self) -> Tier;

    /// Run `query` against this source, returning whatever matches.
    async fn search(&self, query: &Query) -> Result<Vec<Pattern>>;
}

/// Wraps a local, in-process search function (the local/personal/
/// community stores, which never leave the host's filesystem).
pub struct LocalSource<F> {
    tier: Tier,
    search_fn: F,
}

impl<F> LocalSource<F> {
    /// Build a source for `tier` backed by `search_fn`.
    pub fn new(tier: Tier, search_fn: F) -> Self {
        Self { tier, search_fn }
    }
}

#[async_trait]
impl<F> FederationSource for LocalSource<F>
where
    F: Fn(&Query) -> Result<Vec<Pattern>> + Send + Sync,
{
    fn tier(&self) -> Tier {
        self.tier.clone()
    }

    async fn search(&self, query: &Query) -> Result<Vec<Pattern>> {
        (self.search_fn)(query)
    }
}

/// A named remote store reached over HTTP, speaking the `/api/search`
/// wire format.
pub struct RemoteSource {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl RemoteSource {
    /// Build a remote source named `name` at `base_url` (no trailing
    /// slash expected, e.g. `https://peer.example.com`).
    #[must_use]
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            client,
        }
    }
}

#[derive(serde::Serialize)]
struct SearchRequestBody<'a> {
    description: &'a str,
    tags: &'a [String],
    language: Option<&'static str>,
}

#[async_trait]
impl FederationSource for RemoteSource {
    fn tier(&self) -> Tier {
        Tier::Remote(self.name.clone())
    }

    async fn search(&self, query: &Query) -> Result<Vec<Pattern>> {
        let body = SearchRequestBody {
            description: &query.description,
            tags: &query.tags,
            language: query.language.map(remembrance_domain::value_objects::Language::as_str),
        };

        let response = self
            .client
            .post(format!("{}/api/search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::storage(format!("remote tier '{}' unreachable", self.name), e))?;

        response
            .json::<Vec<Pattern>>()
            .await
            .map_err(|e| Error::storage(format!("remote tier '{}' returned malformed results", self.name), e))
    }
}
