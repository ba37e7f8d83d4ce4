//! The bounded fixed-point healing loop: each iteration tries all five
//! transforms against the current code and keeps the best one only if
//! it clears the improvement epsilon.

use remembrance_coherency::CoherencyScorer;
use remembrance_domain::constants::REFLECTION_EPSILON;
use remembrance_domain::value_objects::{CoherencyScore, Language};
use remembrance_language::LanguageRegistry;
use remembrance_safety::SafetyGate;

use crate::transforms;

/// One recorded improvement step taken during a heal run.
#[derive(Debug, Clone)]
pub struct HealStep {
    /// 1-based iteration index.
    pub loop_index: u32,
    /// Name of the transform that produced the improvement.
    pub strategy: &'static str,
    /// Coherency score after this step.
    pub coherency: CoherencyScore,
}

/// Outcome of a full heal run.
#[derive(Debug, Clone)]
pub struct HealResult {
    /// The healed code; equals the input if nothing improved it.
    pub code: String,
    /// Every improving step taken, in order.
    pub steps: Vec<HealStep>,
    /// Score of the input before healing.
    pub original_coherence: CoherencyScore,
    /// Score of `code` after healing.
    pub final_coherence: CoherencyScore,
}

impl HealResult {
    /// `final - original`; zero when nothing improved.
    #[must_use]
    pub fn improvement(&self) -> f64 {
        self.final_coherence.total - self.original_coherence.total
    }

    /// Number of loop iterations that actually improved the code.
    #[must_use]
    pub fn loops(&self) -> u32 {
        self.steps.len() as u32
    }
}

/// Runs the five transforms against candidate code, bounded by a loop
/// count and an improvement epsilon.
pub struct ReflectionEngine<'a> {
    gate: &'a SafetyGate,
    languages: &'a LanguageRegistry,
}

impl<'a> ReflectionEngine<'a> {
    /// Builds an engine backed by the given safety registry and language
    /// capability table.
    #[must_use]
    pub fn new(gate: &'a SafetyGate, languages: &'a LanguageRegistry) -> Self {
        Self { gate, languages }
    }

    /// Runs the bounded heal loop. Never decreases coherency: if no
    /// transform clears the epsilon on the first iteration, `code` in the
    /// result equals `input` and `steps` is empty.
    #[must_use]
    pub fn heal(&self, input: &str, language: Language, max_loops: u32) -> HealResult {
        let scorer = CoherencyScorer::new(self.gate);
        let comment_prefix = self.languages.info(language).comment_prefix;

        let original_coherence = scorer.score(input, language);
        let mut current = input.to_owned();
        let mut current_score = original_coherence;
        let mut steps = Vec::new();

        for loop_index in 1..=max_loops {
            let before = current_score;
            let candidates = transforms::candidates(&current, language, self.gate, comment_prefix);

            let best = candidates
                .into_iter()
                .map(|(name, code)| {
                    let score = scorer.score(&code, language);
                    (name, code, score)
                })
                .max_by(|(_, _, a), (_, _, b)| a.total.partial_cmp(&b.total).unwrap_or(std::cmp::Ordering::Equal));

            let Some((strategy, best_code, best_score)) = best else {
                break;
            };

            if best_score.total > before.total + REFLECTION_EPSILON {
                current = best_code;
                current_score = best_score;
                steps.push(HealStep {
                    loop_index,
                    strategy,
                    coherency: best_score,
                });
            } else {
                break;
            }
        }

        HealResult {
            code: current,
            steps,
            original_coherence,
            final_coherence: current_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_decreases_coherency() {
        let gate = SafetyGate::with_defaults();
        let languages = LanguageRegistry::new();
        let engine = ReflectionEngine::new(&gate, &languages);
        let input = "fn add(a: i32, b: i32) -> i32 { a + b }";
        let result = engine.heal(input, Language::Rust, 3);
        assert!(result.final_coherence.total >= result.original_coherence.total);
    }

    #[test]
    fn clean_input_needs_no_steps() {
        let gate = SafetyGate::with_defaults();
        let languages = LanguageRegistry::new();
        let engine = ReflectionEngine::new(&gate, &languages);
        let input = "fn add(a: i32, b: i32) -> i32 { a + b }";
        let result = engine.heal(input, Language::Rust, 3);
        assert_eq!(result.code, input);
        assert!(result.steps.is_empty());
    }

    #[test]
    fn messy_input_improves_and_records_steps() {
        let gate = SafetyGate::with_defaults();
        let languages = LanguageRegistry::new();
        let engine = ReflectionEngine::new(&gate, &languages);
        let input = "fn add(a: i32, b: i32) -> i32 {   \n\n\n\n    a + b\n}   \n";
        let result = engine.heal(input, Language::Rust, 3);
        assert!(result.improvement() >= 0.0);
    }

    #[test]
    fn loop_count_never_exceeds_max_loops() {
        let gate = SafetyGate::with_defaults();
        let languages = LanguageRegistry::new();
        let engine = ReflectionEngine::new(&gate, &languages);
        let input = "fn f() {\t\n\n\n\neval(x);\n}";
        let result = engine.heal(input, Language::JavaScript, 2);
        assert!(result.loops() <= 2);
    }
}
