//! The five bounded dimension scores that make up a [`CoherencyScore`].
//!
//! [`CoherencyScore`]: remembrance_domain::value_objects::CoherencyScore

use remembrance_ast::analyze;
use remembrance_domain::value_objects::Language;
use remembrance_safety::{CheckOutcome, SafetyGate};

const LONG_LINE_THRESHOLD: usize = 100;
const LONG_FUNCTION_LINE_THRESHOLD: usize = 80;
const MAX_REASONABLE_NESTING: usize = 6;

/// Penalizes long lines, deep indentation nesting, and an overall line
/// count suggestive of an unreasonably long function.
#[must_use]
pub fn simplicity(code: &str) -> f64 {
    let lines: Vec<&str> = code.lines().collect();
    if lines.is_empty() {
        return 1.0;
    }

    let long_line_ratio = lines.iter().filter(|l| l.len() > LONG_LINE_THRESHOLD).count() as f64 / lines.len() as f64;
    let max_nesting = max_indent_depth(&lines);
    let nesting_penalty = (max_nesting as f64 / MAX_REASONABLE_NESTING as f64).min(1.0);
    let length_penalty = (lines.len() as f64 / LONG_FUNCTION_LINE_THRESHOLD as f64 - 1.0).max(0.0).min(1.0);

    (1.0 - 0.4 * long_line_ratio - 0.35 * nesting_penalty - 0.25 * length_penalty).clamp(0.0, 1.0)
}

fn max_indent_depth(lines: &[&str]) -> usize {
    lines
        .iter()
        .map(|line| {
            let leading_spaces = line.len() - line.trim_start().len();
            leading_spaces / 4
        })
        .max()
        .unwrap_or(0)
}

/// Rewards consistent indentation, comment density proportional to code
/// length, and a dominant identifier casing convention.
#[must_use]
pub fn readability(code: &str) -> f64 {
    let lines: Vec<&str> = code.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return 1.0;
    }

    let indent_consistency = indentation_consistency(&lines);
    let comment_density = comment_density_score(code, lines.len());
    let casing_dominance = casing::dominant_convention_ratio(code);

    (0.4 * indent_consistency + 0.3 * comment_density + 0.3 * casing_dominance).clamp(0.0, 1.0)
}

fn indentation_consistency(lines: &[&str]) -> f64 {
    let uses_tabs = lines.iter().filter(|l| l.starts_with('\t')).count();
    let uses_spaces = lines.iter().filter(|l| l.starts_with(' ')).count();
    if uses_tabs > 0 && uses_spaces > 0 {
        0.3
    } else {
        1.0
    }
}

fn comment_density_score(code: &str, non_blank_lines: usize) -> f64 {
    let comment_lines = code
        .lines()
        .filter(|l| {
            let t = l.trim_start();
            t.starts_with("//") || t.starts_with('#') || t.starts_with("/*") || t.starts_with('*')
        })
        .count();
    let ratio = comment_lines as f64 / non_blank_lines as f64;
    // A healthy ratio is modest; too little or a wall of comments both
    // score lower than a middling density.
    1.0 - (ratio - 0.15).abs().min(0.85) / 0.85 * 0.5
}

mod casing {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static SNAKE_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z][a-z0-9]*(_[a-z0-9]+)+\b").expect("valid regex"));
    static CAMEL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z][a-z0-9]*([A-Z][a-z0-9]*)+\b").expect("valid regex"));

    /// Fraction of identifiers matching the more common convention,
    /// `1.0` when only one convention is present at all.
    pub fn dominant_convention_ratio(code: &str) -> f64 {
        let snake = SNAKE_CASE.find_iter(code).count();
        let camel = CAMEL_CASE.find_iter(code).count();
        let total = snake + camel;
        if total == 0 {
            return 1.0;
        }
        snake.max(camel) as f64 / total as f64
    }
}

/// Delegates to [`SafetyGate`]: a clean pass scores `1.0`; each veto and
/// warning discounts the score.
#[must_use]
pub fn security(code: &str, gate: &SafetyGate) -> f64 {
    match gate.check(code) {
        CheckOutcome::Pass => 1.0,
        CheckOutcome::Violations(violations) => {
            let penalty: f64 = violations
                .iter()
                .map(|v| if v.vetoes { 0.5 } else { 0.15 })
                .sum();
            (1.0 - penalty).clamp(0.0, 1.0)
        }
    }
}

/// Rewards one dominant quote style and one dominant naming convention;
/// mixing both penalizes the score.
#[must_use]
pub fn unity(code: &str) -> f64 {
    let single_quotes = code.matches('\'').count();
    let double_quotes = code.matches('"').count();
    let total_quotes = single_quotes + double_quotes;
    let quote_consistency = if total_quotes == 0 {
        1.0
    } else {
        single_quotes.max(double_quotes) as f64 / total_quotes as f64
    };

    let casing_consistency = casing::dominant_convention_ratio(code);

    (0.5 * quote_consistency + 0.5 * casing_consistency).clamp(0.0, 1.0)
}

/// Structural sanity: balanced delimiters, no obviously unreachable code,
/// and no non-void function with no path that returns a value.
#[must_use]
pub fn correctness(code: &str, language: Language) -> f64 {
    let Ok(report) = analyze(code, language) else {
        return 0.0;
    };
    if report.is_clean() {
        return 1.0;
    }
    let mut score = 1.0;
    if !report.balanced {
        score -= 0.6;
    }
    score -= 0.1 * report.unreachable_statements as f64;
    score -= 0.2 * report.functions_missing_return as f64;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_short_function_scores_high_simplicity() {
        assert!(simplicity("fn add(a: i32, b: i32) -> i32 { a + b }") > 0.9);
    }

    #[test]
    fn deeply_nested_code_scores_lower_simplicity() {
        let nested = "fn f() {\n".to_owned()
            + &"    if true {\n".repeat(8)
            + &"    }\n".repeat(8)
            + "}\n";
        assert!(simplicity(&nested) < simplicity("fn f() { 1 }"));
    }

    #[test]
    fn balanced_rust_scores_full_correctness() {
        assert_eq!(correctness("fn add(a: i32, b: i32) -> i32 { a + b }", Language::Rust), 1.0);
    }

    #[test]
    fn unbalanced_rust_scores_lower_correctness() {
        assert!(correctness("fn broken(", Language::Rust) < 1.0);
    }

    #[test]
    fn clean_code_has_full_security_score() {
        let gate = SafetyGate::with_defaults();
        assert_eq!(security("fn add(a: i32, b: i32) -> i32 { a + b }", &gate), 1.0);
    }

    #[test]
    fn eval_call_lowers_security_score() {
        let gate = SafetyGate::with_defaults();
        assert!(security("fn run(x: &str) { eval(x); }", &gate) < 1.0);
    }
}
