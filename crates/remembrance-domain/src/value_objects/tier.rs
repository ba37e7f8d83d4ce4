//! Federation tiers.

use serde::{Deserialize, Serialize};

/// One of the storage tiers `Federation` fans a query out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// This process's own store.
    Local,
    /// The per-user store at a stable filesystem path.
    Personal,
    /// The machine-wide store shared by all users.
    Community,
    /// A named remote store reached over HTTP.
    Remote(String),
}

impl Tier {
    /// Precedence used when merging federated results by `(name, language)`:
    /// lower is preferred. Remote tiers are ordered after local/personal/
    /// community, and ties within `Remote` break on registration order
    /// (handled by the caller, not by this ranking).
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Local => 0,
            Self::Personal => 1,
            Self::Community => 2,
            Self::Remote(_) => 3,
        }
    }

    /// Human-readable tier name, used in federation error reporting.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Local => "local".to_owned(),
            Self::Personal => "personal".to_owned(),
            Self::Community => "community".to_owned(),
            Self::Remote(name) => format!("remote:{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_outranks_remote() {
        assert!(Tier::Local.precedence() < Tier::Remote("foo".to_owned()).precedence());
    }
}
