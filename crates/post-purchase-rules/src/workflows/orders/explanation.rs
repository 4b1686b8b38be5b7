use super::evaluation::{Evaluation, Factor};
use serde::Serialize;
use std::cmp::Reverse;

pub const DEFAULT_EXPLANATION: &str = "standard defaults applied";
pub const SEPARATOR: &str = "; ";
const TOP_REASONS: usize = 2;

/// Ranks factors by weight (descending) then declaration rank (ascending) and
/// renders the most salient ones as a short sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplanationComposer;

impl ExplanationComposer {
    pub fn top_factors<'a, I>(&self, candidates: I) -> Vec<Factor>
    where
        I: IntoIterator<Item = &'a Factor>,
    {
        let mut ranked: Vec<Factor> = candidates.into_iter().copied().collect();
        ranked.sort_by_key(|factor| (Reverse(factor.weight), factor.rank));
        ranked.truncate(TOP_REASONS);
        ranked
    }

    pub fn compose<'a, I>(&self, candidates: I) -> String
    where
        I: IntoIterator<Item = &'a Factor>,
    {
        let top = self.top_factors(candidates);
        if top.is_empty() {
            return DEFAULT_EXPLANATION.to_string();
        }

        top.iter()
            .map(|factor| factor.label)
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    /// Explanations for every decision plus one combined line across all of them.
    pub fn explain(&self, evaluation: &Evaluation) -> Explanations {
        Explanations {
            combined: self.compose(evaluation.factors()),
            edit_window: self.compose(&evaluation.edit_window.factors),
            show_upsell: self.compose(&evaluation.show_upsell.factors),
            strict_address_validation: self.compose(&evaluation.strict_address_validation.factors),
            lock_order_early: self.compose(&evaluation.lock_order_early.factors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanations {
    pub combined: String,
    pub edit_window: String,
    pub show_upsell: String,
    pub strict_address_validation: String,
    pub lock_order_early: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(label: &'static str, weight: u8, rank: u16) -> Factor {
        Factor {
            label,
            weight,
            rank,
        }
    }

    #[test]
    fn heavier_factors_come_first() {
        let factors = [
            factor("light", 1, 0),
            factor("heavy", 3, 4),
            factor("medium", 2, 1),
        ];

        assert_eq!(ExplanationComposer.compose(&factors), "heavy; medium");
    }

    #[test]
    fn ties_break_on_declaration_rank_not_input_order() {
        let forward = [factor("early", 3, 1), factor("late", 3, 7), factor("tail", 3, 9)];
        let reversed = [factor("tail", 3, 9), factor("late", 3, 7), factor("early", 3, 1)];

        let composer = ExplanationComposer;
        assert_eq!(composer.compose(&forward), "early; late");
        assert_eq!(composer.compose(&reversed), "early; late");
        assert_eq!(composer.top_factors(&forward), composer.top_factors(&reversed));
    }

    #[test]
    fn empty_candidates_render_default_label() {
        let none: [Factor; 0] = [];
        assert_eq!(ExplanationComposer.compose(&none), DEFAULT_EXPLANATION);
    }

    #[test]
    fn single_candidate_renders_alone() {
        assert_eq!(
            ExplanationComposer.compose(&[factor("only", 1, 3)]),
            "only"
        );
    }
}
