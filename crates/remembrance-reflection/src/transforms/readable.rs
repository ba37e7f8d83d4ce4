//! Normalizes leading-tab indentation to spaces.

const SPACES_PER_TAB: &str = "    ";

/// Replaces leading tab characters with four spaces each. Idempotent:
/// the output has no leading tabs left to convert on a second pass.
#[must_use]
pub fn apply(code: &str) -> String {
    code.lines()
        .map(expand_leading_tabs)
        .collect::<Vec<_>>()
        .join("\n")
}

fn expand_leading_tabs(line: &str) -> String {
    let leading_tabs = line.chars().take_while(|c| *c == '\t').count();
    if leading_tabs == 0 {
        return line.to_owned();
    }
    let rest = &line[leading_tabs..];
    format!("{}{rest}", SPACES_PER_TAB.repeat(leading_tabs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_leading_tabs() {
        assert_eq!(apply("\tfn f() {}"), "    fn f() {}");
    }

    #[test]
    fn leaves_space_indented_code_untouched() {
        assert_eq!(apply("    fn f() {}"), "    fn f() {}");
    }

    #[test]
    fn is_idempotent() {
        let once = apply("\t\tif x {\n\t\t\treturn 1;\n\t\t}");
        let twice = apply(&once);
        assert_eq!(once, twice);
    }
}
