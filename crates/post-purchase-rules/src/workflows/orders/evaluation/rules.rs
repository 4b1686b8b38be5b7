use super::super::domain::{CustomerType, EditWindow, Industry, OrderRecord, ShippingSpeed};
use super::config::RulesConfig;
use super::{Factor, RuleGroup};
use serde::Serialize;

pub(crate) const HIGH_ORDER_VALUE: f64 = 75.0;
pub(crate) const APPAREL_UPSELL_FLOOR: f64 = 60.0;
pub(crate) const ELECTRONICS_UPSELL_FLOOR: f64 = 120.0;
pub(crate) const FAST_CHECKOUT_MINUTES: u32 = 2;
pub(crate) const FAST_CHECKOUT_VALUE: f64 = 100.0;

/// What a predicate sees: the order plus the category signal in effect for it.
pub(crate) struct RuleInput<'a> {
    pub order: &'a OrderRecord,
    pub industry: Option<Industry>,
}

pub(crate) type Predicate = fn(&RuleInput<'_>) -> bool;

pub(crate) struct Rule {
    pub rank: u16,
    pub predicate: Predicate,
    pub label: &'static str,
    pub weight: u8,
}

impl Rule {
    pub(crate) fn matches(&self, input: &RuleInput<'_>) -> bool {
        (self.predicate)(input)
    }

    pub(crate) fn factor(&self) -> Factor {
        Factor {
            label: self.label,
            weight: self.weight,
            rank: self.rank,
        }
    }
}

pub(crate) struct WindowRule {
    pub rule: Rule,
    pub outcome: EditWindow,
}

/// Edit-window rules in strict priority order plus the fallback that fires only
/// when none of them match.
pub(crate) struct WindowGroup {
    pub rules: Vec<WindowRule>,
    pub fallback: WindowRule,
}

pub(crate) struct RuleBook {
    pub edit_window: WindowGroup,
    pub show_upsell: Vec<Rule>,
    pub strict_address: Vec<Rule>,
    pub lock_early: Vec<Rule>,
}

/// Hands out declaration ranks. The rank is the explanation tie-break key, so it is
/// assigned here once and never derived from container order later.
struct Declarations {
    next_rank: u16,
}

impl Declarations {
    fn declare(&mut self, predicate: Predicate, label: &'static str, weight: u8) -> Rule {
        let rank = self.next_rank;
        self.next_rank += 1;
        Rule {
            rank,
            predicate,
            label,
            weight,
        }
    }

    fn window(
        &mut self,
        predicate: Predicate,
        outcome: EditWindow,
        label: &'static str,
        weight: u8,
    ) -> WindowRule {
        WindowRule {
            rule: self.declare(predicate, label, weight),
            outcome,
        }
    }
}

impl RuleBook {
    pub(crate) fn from_config(config: &RulesConfig) -> Self {
        let mut decl = Declarations { next_rank: 0 };

        let window_rules = vec![
            decl.window(
                |input| input.order.customer_type == CustomerType::Vip,
                EditWindow::Thirty,
                "VIP customer",
                3,
            ),
            decl.window(
                |input| input.order.discount_used && input.order.past_edits == 0,
                EditWindow::Ten,
                "first edit after discount — tighter window",
                3,
            ),
            decl.window(
                |input| input.order.shipping_speed == ShippingSpeed::Express,
                EditWindow::Ten,
                "express shipping — fast fulfillment",
                2,
            ),
            decl.window(
                |input| {
                    input.order.customer_type == CustomerType::Repeat
                        && input.order.past_edits >= 1
                },
                EditWindow::TwentyFive,
                "repeat customer with edit history",
                2,
            ),
            decl.window(
                |input| input.order.customer_type == CustomerType::FirstTime,
                EditWindow::Twenty,
                "first-time customer — standard grace",
                1,
            ),
        ];
        let fallback = decl.window(
            |_| true,
            config.default_window,
            "standard default window",
            1,
        );

        let mut show_upsell = Vec::new();
        if config.enable_upsell {
            show_upsell.push(decl.declare(
                |input| input.order.order_value >= HIGH_ORDER_VALUE,
                "high order value",
                3,
            ));
            show_upsell.push(decl.declare(
                |input| {
                    input.order.customer_type == CustomerType::Vip
                        && input.order.order_value >= HIGH_ORDER_VALUE
                },
                "VIP customer — upsell eligible",
                2,
            ));
            show_upsell.push(decl.declare(
                |input| {
                    input.industry == Some(Industry::Apparel)
                        && input.order.order_value >= APPAREL_UPSELL_FLOOR
                },
                "apparel basket above category threshold",
                1,
            ));
            show_upsell.push(decl.declare(
                |input| {
                    input.industry == Some(Industry::Electronics)
                        && input.order.order_value >= ELECTRONICS_UPSELL_FLOOR
                },
                "electronics basket above category threshold",
                1,
            ));
        }

        let mut strict_address = vec![
            decl.declare(
                |input| input.order.address_change_requests >= 2,
                "multiple address changes",
                3,
            ),
            decl.declare(
                |input| {
                    input.order.customer_type == CustomerType::FirstTime
                        && input.order.address_change_requests >= 1
                },
                "first-time customer changed address",
                2,
            ),
        ];

        let mut lock_early = vec![
            decl.declare(
                |input| {
                    input.order.customer_type == CustomerType::FirstTime
                        && input.order.discount_used
                        && input.order.address_change_requests >= 1
                },
                "first-time + discount + address change — fraud risk pattern",
                3,
            ),
            decl.declare(
                |input| input.order.past_cancels >= 2,
                "repeated past cancellations",
                3,
            ),
            decl.declare(
                |input| {
                    input.order.minutes_since_checkout <= FAST_CHECKOUT_MINUTES
                        && input.order.order_value >= FAST_CHECKOUT_VALUE
                },
                "very fast high-value checkout",
                1,
            ),
        ];

        if config.conservative {
            strict_address.push(decl.declare(
                |input| input.order.customer_type == CustomerType::FirstTime,
                "conservative mode: first-time customer",
                1,
            ));
            lock_early.push(decl.declare(
                |input| input.order.address_change_requests >= 2,
                "conservative mode: multiple address changes",
                2,
            ));
        }

        Self {
            edit_window: WindowGroup {
                rules: window_rules,
                fallback,
            },
            show_upsell,
            strict_address,
            lock_early,
        }
    }

    pub(crate) fn catalog(&self) -> Vec<RuleDescriptor> {
        let window = self
            .edit_window
            .rules
            .iter()
            .chain(std::iter::once(&self.edit_window.fallback))
            .map(|entry| {
                RuleDescriptor::new(RuleGroup::EditWindow, &entry.rule, Some(entry.outcome))
            });

        let flags = [
            (RuleGroup::ShowUpsell, &self.show_upsell),
            (RuleGroup::StrictAddressValidation, &self.strict_address),
            (RuleGroup::LockOrderEarly, &self.lock_early),
        ]
        .into_iter()
        .flat_map(|(group, rules)| {
            rules
                .iter()
                .map(move |rule| RuleDescriptor::new(group, rule, None))
        });

        let mut catalog: Vec<RuleDescriptor> = window.chain(flags).collect();
        catalog.sort_by_key(|descriptor| descriptor.rank);
        catalog
    }
}

/// Auditable description of one declared rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleDescriptor {
    pub group: RuleGroup,
    pub rank: u16,
    pub label: &'static str,
    pub weight: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_window_minutes: Option<EditWindow>,
}

impl RuleDescriptor {
    fn new(group: RuleGroup, rule: &Rule, outcome: Option<EditWindow>) -> Self {
        Self {
            group,
            rank: rule.rank,
            label: rule.label,
            weight: rule.weight,
            edit_window_minutes: outcome,
        }
    }
}
