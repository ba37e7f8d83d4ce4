//! Drops statements that can never execute because they follow an
//! unconditional `return` within the same block.

use remembrance_ast::analyze;
use remembrance_domain::value_objects::Language;

/// Only rewrites `code` when [`remembrance_ast::analyze`] reports
/// unreachable statements; otherwise returns it unchanged. Idempotent:
/// once dead statements are dropped, a second analysis finds none left.
#[must_use]
pub fn apply(code: &str, language: Language) -> String {
    match analyze(code, language) {
        Ok(report) if report.unreachable_statements > 0 => strip_dead_code_after_return(code),
        _ => code.to_owned(),
    }
}

fn strip_dead_code_after_return(code: &str) -> String {
    let mut out = Vec::new();
    let mut dead_block_indent: Option<usize> = None;

    for line in code.lines() {
        let indent = leading_width(line);
        let trimmed = line.trim_start();

        if let Some(return_indent) = dead_block_indent {
            if trimmed.is_empty() {
                continue;
            }
            if indent < return_indent {
                dead_block_indent = None;
            } else {
                continue;
            }
        }

        out.push(line.to_owned());
        if is_return_statement(trimmed) {
            dead_block_indent = Some(indent);
        }
    }

    out.join("\n")
}

fn is_return_statement(trimmed: &str) -> bool {
    trimmed == "return" || trimmed == "return;" || (trimmed.starts_with("return ") && trimmed.ends_with(';'))
}

fn leading_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_statement_after_unconditional_return() {
        let input = "fn f() -> i32 {\n    return 1;\n    println!(\"dead\");\n}\n";
        let out = apply(input, Language::Rust);
        assert!(!out.contains("dead"));
    }

    #[test]
    fn keeps_code_after_a_conditional_return() {
        let input = "fn f(x: bool) {\n    if x {\n        return;\n    }\n    println!(\"reachable\");\n}\n";
        let out = apply(input, Language::Rust);
        assert!(out.contains("reachable"));
    }

    #[test]
    fn leaves_clean_code_untouched() {
        let input = "fn add(a: i32, b: i32) -> i32 { a + b }";
        assert_eq!(apply(input, Language::Rust), input);
    }

    #[test]
    fn is_idempotent() {
        let input = "fn f() -> i32 {\n    return 1;\n    println!(\"dead\");\n}\n";
        let once = apply(input, Language::Rust);
        let twice = apply(&once, Language::Rust);
        assert_eq!(once, twice);
    }
}
