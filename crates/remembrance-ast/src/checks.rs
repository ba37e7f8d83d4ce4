//! Structural checks feeding `CoherencyScorer`'s `correctness` dimension:
//! delimiter balance, unreachable statements, and non-void functions with
//! no path that returns a value.

use remembrance_domain::value_objects::Language;
use tree_sitter::Node;

use crate::error::Result;
use crate::parser::parse;

/// Result of a structural pass over one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralReport {
    /// `false` when tree-sitter recovered from a syntax error (unbalanced
    /// delimiters, truncated constructs, ...).
    pub balanced: bool,
    /// Statements found after an unconditional terminal statement
    /// (`return`/`break`/`continue`/`throw`) within the same block.
    pub unreachable_statements: usize,
    /// Functions whose declared return type is non-void but which have no
    /// statement that returns a value on any obviously-reachable path.
    pub functions_missing_return: usize,
}

impl StructuralReport {
    /// `true` when none of the checks found a problem.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.balanced && self.unreachable_statements == 0 && self.functions_missing_return == 0
    }
}

/// Run every structural check against `source`.
pub fn analyze(source: &str, language: Language) -> Result<StructuralReport> {
    let tree = parse(source, language)?;
    let root = tree.root_node();

    let mut report = StructuralReport {
        balanced: !root.has_error(),
        ..StructuralReport::default()
    };
    walk_blocks(root, language, &mut report);
    walk_functions(root, source.as_bytes(), language, &mut report);
    Ok(report)
}

fn block_kind(kind: &str, language: Language) -> bool {
    match language {
        Language::Rust => kind == "block",
        Language::Python => kind == "block",
        Language::JavaScript | Language::TypeScript => kind == "statement_block",
        Language::Go | Language::Java => kind == "block",
        Language::C | Language::Cpp => kind == "compound_statement",
    }
}

fn terminal_kind(kind: &str, language: Language) -> bool {
    match language {
        Language::Rust => matches!(
            kind,
            "return_expression" | "break_expression" | "continue_expression"
        ),
        Language::Python => matches!(
            kind,
            "return_statement" | "break_statement" | "continue_statement" | "raise_statement"
        ),
        Language::JavaScript | Language::TypeScript => matches!(
            kind,
            "return_statement" | "break_statement" | "continue_statement" | "throw_statement"
        ),
        Language::Go => matches!(kind, "return_statement" | "break_statement" | "continue_statement"),
        Language::Java => matches!(
            kind,
            "return_statement" | "break_statement" | "continue_statement" | "throw_statement"
        ),
        Language::C | Language::Cpp => {
            matches!(kind, "return_statement" | "break_statement" | "continue_statement")
        }
    }
}

/// Rust wraps a mid-block terminal expression in an `expression_statement`;
/// unwrap it so the kind check above still applies.
fn statement_kind<'a>(node: Node<'a>, language: Language) -> Node<'a> {
    if language == Language::Rust && node.kind() == "expression_statement" {
        if let Some(child) = node.named_child(0) {
            return child;
        }
    }
    node
}

fn walk_blocks(node: Node<'_>, language: Language, report: &mut StructuralReport) {
    if block_kind(node.kind(), language) {
        let mut cursor = node.walk();
        let statements: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        if let Some(terminal_index) = statements
            .iter()
            .position(|s| terminal_kind(statement_kind(*s, language).kind(), language))
        {
            let trailing = statements.len().saturating_sub(terminal_index + 1);
            report.unreachable_statements += trailing;
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_blocks(child, language, report);
    }
}

fn function_kind(kind: &str, language: Language) -> bool {
    match language {
        Language::Rust => kind == "function_item",
        Language::Python => kind == "function_definition",
        Language::JavaScript => matches!(kind, "function_declaration" | "method_definition"),
        Language::TypeScript => matches!(kind, "function_declaration" | "method_definition"),
        Language::Go => matches!(kind, "function_declaration" | "method_declaration"),
        Language::Java => kind == "method_declaration",
        Language::C | Language::Cpp => kind == "function_definition",
    }
}

/// Whether a function node's declared return type is non-void. Absent or
/// unavailable type information means "skip the check" rather than "missing".
fn declares_non_void_return(node: Node<'_>, source_bytes: &[u8], language: Language) -> bool {
    let type_text = |field: &str| -> Option<String> {
        node.child_by_field_name(field)
            .and_then(|n| n.utf8_text(source_bytes).ok())
            .map(str::to_owned)
    };

    match language {
        Language::Rust => type_text("return_type").is_some(),
        Language::Python => type_text("return_type").is_some_and(|t| t != "None" && t != "NoReturn"),
        Language::TypeScript => type_text("return_type").is_some_and(|t| t.trim() != "void"),
        Language::Go => node.child_by_field_name("result").is_some(),
        Language::Java | Language::C | Language::Cpp => {
            type_text("type").is_some_and(|t| t.trim() != "void")
        }
        Language::JavaScript => false,
    }
}

fn body_has_value_return(node: Node<'_>, language: Language) -> bool {
    if language == Language::Rust && node.kind() == "block" && rust_block_has_tail_expression(node) {
        return true;
    }
    if terminal_kind(node.kind(), language) && node.kind().starts_with("return") {
        return node.named_child_count() > 0;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| body_has_value_return(child, language))
}

/// Rust's implicit tail-expression return: the last named child of a block
/// is a bare expression (no trailing `;`, so it is not wrapped in an
/// `expression_statement`) rather than a declaration or statement.
fn rust_block_has_tail_expression(block: Node<'_>) -> bool {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .last()
        .is_some_and(|last| !matches!(last.kind(), "expression_statement" | "let_declaration" | "item" | "empty_statement" | "comment"))
}

fn walk_functions(node: Node<'_>, source_bytes: &[u8], language: Language, report: &mut StructuralReport) {
    if function_kind(node.kind(), language)
        && declares_non_void_return(node, source_bytes, language)
        && node
            .child_by_field_name("body")
            .is_some_and(|body| !body_has_value_return(body, language))
    {
        report.functions_missing_return += 1;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_functions(child, source_bytes, language, report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unbalanced_rust() {
        let report = analyze("fn broken(", Language::Rust).expect("parses with an error tree");
        assert!(!report.balanced);
    }

    #[test]
    fn clean_rust_function_is_balanced() {
        let report = analyze("fn add(a: i32, b: i32) -> i32 { a + b }", Language::Rust).expect("parses");
        assert!(report.balanced);
    }

    #[test]
    fn flags_code_after_return() {
        let src = "fn f() -> i32 { return 1; let x = 2; x }";
        let report = analyze(src, Language::Rust).expect("parses");
        assert!(report.unreachable_statements >= 1);
    }

    #[test]
    fn no_unreachable_in_straight_line_code() {
        let src = "fn f() -> i32 { let x = 1; let y = 2; x + y }";
        let report = analyze(src, Language::Rust).expect("parses");
        assert_eq!(report.unreachable_statements, 0);
    }
}
