use super::super::domain::EditWindow;
use super::rules::{Rule, RuleInput, WindowGroup};
use super::Decision;

/// Priority resolution for the edit window.
///
/// The value comes from the first matching rule in declaration order. The factor list
/// is a separate full scan so that rules outranked for the value still show up as
/// explanation candidates. The fallback contributes only when nothing else matched.
pub(crate) fn resolve_window(group: &WindowGroup, input: &RuleInput<'_>) -> Decision<EditWindow> {
    let winner = group
        .rules
        .iter()
        .find(|entry| entry.rule.matches(input))
        .map(|entry| entry.outcome);

    let factors: Vec<_> = group
        .rules
        .iter()
        .filter(|entry| entry.rule.matches(input))
        .map(|entry| entry.rule.factor())
        .collect();

    match winner {
        Some(value) => Decision { value, factors },
        None => Decision {
            value: group.fallback.outcome,
            factors: vec![group.fallback.rule.factor()],
        },
    }
}

/// OR-of-conditions resolution: true iff any rule holds, one factor per holding rule.
pub(crate) fn resolve_any(rules: &[Rule], input: &RuleInput<'_>) -> Decision<bool> {
    let factors: Vec<_> = rules
        .iter()
        .filter(|rule| rule.matches(input))
        .map(Rule::factor)
        .collect();

    Decision {
        value: !factors.is_empty(),
        factors,
    }
}
