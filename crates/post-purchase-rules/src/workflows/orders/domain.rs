use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer segment recorded at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    FirstTime,
    Repeat,
    Vip,
}

impl CustomerType {
    pub const ALLOWED: &'static [&'static str] = &["first_time", "repeat", "vip"];

    pub fn ordered() -> [CustomerType; 3] {
        [
            CustomerType::FirstTime,
            CustomerType::Repeat,
            CustomerType::Vip,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::FirstTime => "first_time",
            CustomerType::Repeat => "repeat",
            CustomerType::Vip => "vip",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingSpeed {
    Standard,
    Express,
}

impl ShippingSpeed {
    pub const ALLOWED: &'static [&'static str] = &["standard", "express"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingSpeed::Standard => "standard",
            ShippingSpeed::Express => "express",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(ShippingSpeed::Standard),
            "express" => Some(ShippingSpeed::Express),
            _ => None,
        }
    }
}

impl fmt::Display for ShippingSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchant category used as an optional upsell signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Apparel,
    Beauty,
    Electronics,
    Supplements,
}

impl Industry {
    pub const ALLOWED: &'static [&'static str] =
        &["apparel", "beauty", "electronics", "supplements"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Apparel => "apparel",
            Industry::Beauty => "beauty",
            Industry::Electronics => "electronics",
            Industry::Supplements => "supplements",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "apparel" => Some(Industry::Apparel),
            "beauty" => Some(Industry::Beauty),
            "electronics" => Some(Industry::Electronics),
            "supplements" => Some(Industry::Supplements),
            _ => None,
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only edit windows the engine ever recommends.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u32")]
pub enum EditWindow {
    Ten,
    #[default]
    Fifteen,
    Twenty,
    TwentyFive,
    Thirty,
}

impl EditWindow {
    pub fn ordered() -> [EditWindow; 5] {
        [
            EditWindow::Ten,
            EditWindow::Fifteen,
            EditWindow::Twenty,
            EditWindow::TwentyFive,
            EditWindow::Thirty,
        ]
    }

    pub fn minutes(&self) -> u8 {
        match self {
            EditWindow::Ten => 10,
            EditWindow::Fifteen => 15,
            EditWindow::Twenty => 20,
            EditWindow::TwentyFive => 25,
            EditWindow::Thirty => 30,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|window| u32::from(window.minutes()) == minutes)
    }
}

impl From<EditWindow> for u8 {
    fn from(window: EditWindow) -> Self {
        window.minutes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("edit window must be one of 10, 15, 20, 25 or 30 minutes (found {0})")]
pub struct InvalidEditWindow(pub u32);

impl TryFrom<u32> for EditWindow {
    type Error = InvalidEditWindow;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(minutes).ok_or(InvalidEditWindow(minutes))
    }
}

impl fmt::Display for EditWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.minutes())
    }
}

/// A validated order row. Immutable once produced by the schema validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_type: CustomerType,
    pub order_value: f64,
    pub discount_used: bool,
    pub past_edits: u32,
    pub past_cancels: u32,
    pub shipping_speed: ShippingSpeed,
    pub minutes_since_checkout: u32,
    pub address_change_requests: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<Industry>,
}
