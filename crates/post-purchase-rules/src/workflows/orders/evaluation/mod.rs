mod config;
mod policy;
mod rules;

pub use config::RulesConfig;
pub use rules::RuleDescriptor;

use super::domain::{EditWindow, OrderRecord};
use policy::{resolve_any, resolve_window};
use rules::{RuleBook, RuleInput};
use serde::Serialize;
use tracing::debug;

/// Stateless evaluator holding the rule book built from one configuration.
pub struct RuleEngine {
    config: RulesConfig,
    rules: RuleBook,
}

impl RuleEngine {
    pub fn new(config: RulesConfig) -> Self {
        let rules = RuleBook::from_config(&config);
        Self { config, rules }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Scores one order. Total for every validated record: each group either matches a
    /// rule or resolves to its default.
    pub fn evaluate(&self, order: &OrderRecord) -> Evaluation {
        let input = RuleInput {
            order,
            industry: order.industry.or(self.config.default_industry),
        };

        let evaluation = Evaluation {
            edit_window: resolve_window(&self.rules.edit_window, &input),
            show_upsell: resolve_any(&self.rules.show_upsell, &input),
            strict_address_validation: resolve_any(&self.rules.strict_address, &input),
            lock_order_early: resolve_any(&self.rules.lock_early, &input),
        };

        debug!(
            order_id = %order.order_id,
            edit_window = evaluation.edit_window.value.minutes(),
            show_upsell = evaluation.show_upsell.value,
            strict_address_validation = evaluation.strict_address_validation.value,
            lock_order_early = evaluation.lock_order_early.value,
            "order evaluated"
        );

        evaluation
    }

    /// Every declared rule in declaration order.
    pub fn catalog(&self) -> Vec<RuleDescriptor> {
        self.rules.catalog()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

/// The four decisions the engine produces for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleGroup {
    EditWindow,
    ShowUpsell,
    StrictAddressValidation,
    LockOrderEarly,
}

impl RuleGroup {
    pub fn label(&self) -> &'static str {
        match self {
            RuleGroup::EditWindow => "Edit window",
            RuleGroup::ShowUpsell => "Show upsell",
            RuleGroup::StrictAddressValidation => "Strict address validation",
            RuleGroup::LockOrderEarly => "Lock order early",
        }
    }
}

/// Weighted reason contributed by a rule that fired. `rank` is the rule's declaration
/// index and breaks weight ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Factor {
    pub label: &'static str,
    pub weight: u8,
    pub rank: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision<T> {
    pub value: T,
    pub factors: Vec<Factor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub edit_window: Decision<EditWindow>,
    pub show_upsell: Decision<bool>,
    pub strict_address_validation: Decision<bool>,
    pub lock_order_early: Decision<bool>,
}

impl Evaluation {
    /// Factors of all four decisions, grouped in decision order.
    pub fn factors(&self) -> impl Iterator<Item = &Factor> {
        self.edit_window
            .factors
            .iter()
            .chain(&self.show_upsell.factors)
            .chain(&self.strict_address_validation.factors)
            .chain(&self.lock_order_early.factors)
    }

    pub fn window_expired(&self, order: &OrderRecord) -> bool {
        order.minutes_since_checkout > u32::from(self.edit_window.value.minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::orders::domain::{CustomerType, Industry, ShippingSpeed};

    fn order() -> OrderRecord {
        OrderRecord {
            order_id: "ORD-T1".to_string(),
            customer_type: CustomerType::Repeat,
            order_value: 40.0,
            discount_used: false,
            past_edits: 0,
            past_cancels: 0,
            shipping_speed: ShippingSpeed::Standard,
            minutes_since_checkout: 12,
            address_change_requests: 0,
            industry: None,
        }
    }

    #[test]
    fn ranks_follow_declaration_order() {
        let catalog = RuleEngine::default().catalog();

        assert_eq!(catalog.len(), 6 + 4 + 2 + 3);
        assert!(catalog
            .iter()
            .enumerate()
            .all(|(index, rule)| rule.rank as usize == index));
        assert_eq!(catalog[0].label, "VIP customer");
        assert_eq!(catalog[5].label, "standard default window");
        assert_eq!(catalog[5].edit_window_minutes, Some(EditWindow::Fifteen));
        assert_eq!(catalog[6].group, RuleGroup::ShowUpsell);
    }

    #[test]
    fn fallback_fires_only_when_nothing_else_matches() {
        let evaluation = RuleEngine::default().evaluate(&order());

        assert_eq!(evaluation.edit_window.value, EditWindow::Fifteen);
        let labels: Vec<_> = evaluation
            .edit_window
            .factors
            .iter()
            .map(|factor| factor.label)
            .collect();
        assert_eq!(labels, vec!["standard default window"]);

        let mut first_time = order();
        first_time.customer_type = CustomerType::FirstTime;
        let evaluation = RuleEngine::default().evaluate(&first_time);
        assert_eq!(evaluation.edit_window.value, EditWindow::Twenty);
        assert!(evaluation
            .edit_window
            .factors
            .iter()
            .all(|factor| factor.label != "standard default window"));
    }

    #[test]
    fn configured_default_window_is_used_by_fallback() {
        let engine = RuleEngine::new(RulesConfig {
            default_window: EditWindow::TwentyFive,
            ..RulesConfig::default()
        });

        assert_eq!(
            engine.evaluate(&order()).edit_window.value,
            EditWindow::TwentyFive
        );
    }

    #[test]
    fn disabled_upsell_never_fires() {
        let engine = RuleEngine::new(RulesConfig {
            enable_upsell: false,
            ..RulesConfig::default()
        });
        let mut big_basket = order();
        big_basket.order_value = 420.0;

        let evaluation = engine.evaluate(&big_basket);

        assert!(!evaluation.show_upsell.value);
        assert!(evaluation.show_upsell.factors.is_empty());
    }

    #[test]
    fn row_industry_overrides_configured_default() {
        let engine = RuleEngine::new(RulesConfig {
            default_industry: Some(Industry::Apparel),
            ..RulesConfig::default()
        });
        let mut apparel = order();
        apparel.order_value = 65.0;

        let evaluation = engine.evaluate(&apparel);
        assert!(evaluation.show_upsell.value);
        assert_eq!(
            evaluation.show_upsell.factors[0].label,
            "apparel basket above category threshold"
        );

        apparel.industry = Some(Industry::Beauty);
        assert!(!engine.evaluate(&apparel).show_upsell.value);
    }

    #[test]
    fn window_expiry_compares_against_resolved_window() {
        let mut late = order();
        late.minutes_since_checkout = 16;
        let evaluation = RuleEngine::default().evaluate(&late);
        assert!(evaluation.window_expired(&late));

        late.minutes_since_checkout = 15;
        assert!(!evaluation.window_expired(&late));
    }
}
