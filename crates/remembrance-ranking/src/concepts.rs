//! A fixed concept → related-tags table used for the Ranker's
//! concept-cluster expansion dimension. Deliberately small and closed:
//! expanding it is a data change, not a behavioral one.

/// `(concept, related tags)` pairs. A query tag matching `concept`
/// expands to also search for every tag in the second element.
const CONCEPT_TAGS: &[(&str, &[&str])] = &[
    ("iteration", &["loop", "iterator", "for", "while", "recursion"]),
    ("concurrency", &["async", "thread", "lock", "channel", "mutex"]),
    ("error-handling", &["result", "exception", "panic", "try", "catch"]),
    ("collection", &["list", "array", "map", "set", "vector"]),
    ("io", &["file", "stream", "socket", "network", "buffer"]),
    ("parsing", &["lexer", "tokenizer", "grammar", "ast", "regex"]),
    ("testing", &["mock", "fixture", "assertion", "unit-test"]),
    ("security", &["auth", "crypto", "sanitize", "validate", "secret"]),
];

/// Tags reachable from `tag` via one concept-cluster hop, `tag` itself
/// included.
#[must_use]
pub fn expand(tag: &str) -> Vec<&'static str> {
    let mut expanded = Vec::new();
    for (concept, related) in CONCEPT_TAGS {
        if *concept == tag {
            expanded.extend_from_slice(related);
        } else if related.contains(&tag) {
            expanded.push(*concept);
            expanded.extend(related.iter().filter(|r| **r != tag));
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concept_expands_to_its_members() {
        let expanded = expand("iteration");
        assert!(expanded.contains(&"loop"));
    }

    #[test]
    fn member_expands_back_to_concept_and_siblings() {
        let expanded = expand("loop");
        assert!(expanded.contains(&"iteration"));
        assert!(expanded.contains(&"iterator"));
    }

    #[test]
    fn unknown_tag_expands_to_nothing() {
        assert!(expand("not-a-real-tag").is_empty());
    }
}
