//! The five transforms, applied independently to the same input and
//! fed into the heal loop's argmax-over-candidates step.

pub mod correct;
pub mod readable;
pub mod secure;
pub mod simplify;
pub mod unify;

use remembrance_domain::value_objects::Language;
use remembrance_safety::SafetyGate;

/// Fixed transform order: `simplify`, `secure`, `readable`, `unify`,
/// `correct`. The heal loop relies on this order only for the name it
/// records alongside the winning candidate; all five are always
/// computed from the same `current` input, never chained.
pub fn candidates(code: &str, language: Language, gate: &SafetyGate, comment_prefix: Option<&str>) -> Vec<(&'static str, String)> {
    vec![
        ("simplify", simplify::apply(code)),
        ("secure", secure::apply(code, gate, comment_prefix)),
        ("readable", readable::apply(code)),
        ("unify", unify::apply(code)),
        ("correct", correct::apply(code, language)),
    ]
}
