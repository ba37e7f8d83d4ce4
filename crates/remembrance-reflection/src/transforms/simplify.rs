//! Strips trailing whitespace and collapses runs of blank lines.

use once_cell::sync::Lazy;
use regex::Regex;

static TRIPLE_BLANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Idempotent: a second pass over the output finds no trailing
/// whitespace and no blank run longer than one line.
#[must_use]
pub fn apply(code: &str) -> String {
    let trimmed: Vec<&str> = code.lines().map(str::trim_end).collect();
    let joined = trimmed.join("\n");
    TRIPLE_BLANK.replace_all(&joined, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_whitespace() {
        assert_eq!(apply("fn f() {}   \n"), "fn f() {}");
    }

    #[test]
    fn collapses_excess_blank_lines() {
        let input = "a\n\n\n\n\nb";
        assert_eq!(apply(input), "a\n\nb");
    }

    #[test]
    fn is_idempotent() {
        let input = "a   \n\n\n\nb\t\n";
        let once = apply(input);
        let twice = apply(&once);
        assert_eq!(once, twice);
    }
}
