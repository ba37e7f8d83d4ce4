//! Normalizes string-literal quoting to whichever style already
//! dominates the file.

/// Rewrites every unescaped `'` or `"` to the majority quote character.
/// A no-op (and therefore idempotent) once one style already dominates
/// exclusively, which is the case after the first pass.
#[must_use]
pub fn apply(code: &str) -> String {
    let singles = code.matches('\'').count();
    let doubles = code.matches('"').count();
    if singles == 0 || doubles == 0 {
        return code.to_owned();
    }

    let (from, to) = if doubles >= singles { ('\'', '"') } else { ('"', '\'') };
    replace_unescaped(code, from, to)
}

fn replace_unescaped(code: &str, from: char, to: char) -> String {
    let mut out = String::with_capacity(code.len());
    let mut chars = code.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(c);
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }
        out.push(if c == from { to } else { c });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_minority_quote_style() {
        let input = r#"let a = "x"; let b = 'y';"#;
        assert_eq!(apply(input), r#"let a = "x"; let b = "y";"#);
    }

    #[test]
    fn leaves_single_style_code_untouched() {
        let input = r#"let a = "x"; let b = "y";"#;
        assert_eq!(apply(input), input);
    }

    #[test]
    fn preserves_escaped_quotes() {
        let input = r#"let a = "x\"y"; let b = 'z';"#;
        let out = apply(input);
        assert!(out.contains("\\\""));
    }

    #[test]
    fn is_idempotent() {
        let input = r#"let a = "x"; let b = 'y';"#;
        let once = apply(input);
        let twice = apply(&once);
        assert_eq!(once, twice);
    }
}
