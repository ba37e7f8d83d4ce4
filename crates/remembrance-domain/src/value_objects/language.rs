//! The closed set of languages the system understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::error::Error;

/// A supported source language. Kept as a closed enum (rather than a free
/// string) so every downstream component — scorer, sandbox, safety gate,
/// reflection — can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Rust.
    Rust,
    /// Python.
    Python,
    /// JavaScript.
    JavaScript,
    /// TypeScript.
    TypeScript,
    /// Go.
    Go,
    /// Java.
    Java,
    /// C.
    C,
    /// C++.
    Cpp,
}

impl Language {
    /// Canonical lowercase name, used for storage keys and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Go => "go",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
        }
    }

    /// The "family" used by the Ranker's within-family language match
    /// (e.g. JS and TS share a family).
    #[must_use]
    pub fn family(self) -> &'static str {
        match self {
            Self::JavaScript | Self::TypeScript => "ecmascript",
            Self::C | Self::Cpp => "native-c",
            other => other.as_str(),
        }
    }

    /// Whether two languages are exact matches, within-family matches, or
    /// unrelated. Returns `1.0`, `0.7`, or `0.0` per the Ranker's language
    /// match weighting.
    #[must_use]
    pub fn match_score(self, other: Self) -> f64 {
        if self == other {
            1.0
        } else if self.family() == other.family() {
            0.7
        } else {
            0.0
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "python" | "py" => Ok(Self::Python),
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "go" | "golang" => Ok(Self::Go),
            "java" => Ok(Self::Java),
            "c" => Ok(Self::C),
            "cpp" | "c++" | "cxx" => Ok(Self::Cpp),
            other => Err(Error::InvalidLanguage {
                name: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_family_scores_0_7() {
        assert_eq!(Language::JavaScript.match_score(Language::TypeScript), 0.7);
    }

    #[test]
    fn exact_match_scores_1() {
        assert_eq!(Language::Rust.match_score(Language::Rust), 1.0);
    }

    #[test]
    fn unrelated_scores_0() {
        assert_eq!(Language::Rust.match_score(Language::Python), 0.0);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert!("brainfuck".parse::<Language>().is_err());
    }
}
