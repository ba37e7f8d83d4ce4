//! Parallel tiered fan-out over local/personal/community/remote pattern
//! stores (spec §4.J), plus the personal→community share-write rule.

pub mod fanout;
pub mod share;
pub mod source;

pub use fanout::{federated_search, MergedResults, TierError};
pub use share::eligible_for_community_share;
pub use source::{FederationSource, LocalSource, RemoteSource};
