//! Opaque, newtyped identifiers. Each wraps a 128-bit UUID so the store
//! never leaks its internal representation to callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

macro_rules! opaque_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|_| Error::InvalidId { value: s.to_owned() })
            }
        }
    };
}

opaque_id!(PatternId, "Identifies a [`crate::entities::pattern::Pattern`].");
opaque_id!(VariantId, "Identifies a [`crate::entities::healed_variant::HealedVariant`].");
opaque_id!(DebugPatternId, "Identifies a [`crate::entities::debug_pattern::DebugPattern`].");
