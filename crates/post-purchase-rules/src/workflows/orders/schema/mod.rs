//! Schema validation for raw order rows.
//!
//! Column problems are batch-level: [`ColumnMapping::resolve`] fails with a
//! [`SchemaError`] before any row is looked at. Value problems are row-level:
//! [`validate_row`] collects every [`FieldError`] in the row so a single bad cell
//! never hides another.

mod coerce;
mod mapping;
mod normalizer;

pub use mapping::{ColumnMapping, ResolvedColumns};

use super::domain::{CustomerType, Industry, OrderRecord, ShippingSpeed};
use serde::Serialize;
use std::fmt;

/// Canonical input columns, in template order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "order_id",
    "customer_type",
    "order_value",
    "discount_used",
    "past_edits",
    "past_cancels",
    "shipping_speed",
    "minutes_since_checkout",
    "address_change_requests",
];

pub const OPTIONAL_COLUMNS: [&str; 1] = ["industry"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    OrderId,
    CustomerType,
    OrderValue,
    DiscountUsed,
    PastEdits,
    PastCancels,
    ShippingSpeed,
    MinutesSinceCheckout,
    AddressChangeRequests,
    Industry,
}

impl OrderField {
    pub fn required() -> [OrderField; 9] {
        [
            OrderField::OrderId,
            OrderField::CustomerType,
            OrderField::OrderValue,
            OrderField::DiscountUsed,
            OrderField::PastEdits,
            OrderField::PastCancels,
            OrderField::ShippingSpeed,
            OrderField::MinutesSinceCheckout,
            OrderField::AddressChangeRequests,
        ]
    }

    pub fn all() -> [OrderField; 10] {
        let [a, b, c, d, e, f, g, h, i] = Self::required();
        [a, b, c, d, e, f, g, h, i, OrderField::Industry]
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrderField::OrderId => "order_id",
            OrderField::CustomerType => "customer_type",
            OrderField::OrderValue => "order_value",
            OrderField::DiscountUsed => "discount_used",
            OrderField::PastEdits => "past_edits",
            OrderField::PastCancels => "past_cancels",
            OrderField::ShippingSpeed => "shipping_speed",
            OrderField::MinutesSinceCheckout => "minutes_since_checkout",
            OrderField::AddressChangeRequests => "address_change_requests",
            OrderField::Industry => "industry",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, OrderField::Industry)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Batch-level failure: no row can be validated until it is fixed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required columns: {}", join_fields(.missing))]
    MissingColumns { missing: Vec<OrderField> },
    #[error("column mapping refers to unknown field '{0}'")]
    UnknownField(String),
}

fn join_fields(fields: &[OrderField]) -> String {
    fields
        .iter()
        .map(OrderField::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Row-level failure for a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    /// The cell cannot be coerced to the column's type.
    #[error("{field}: cannot read '{raw}' as {expected}")]
    Type {
        field: OrderField,
        raw: String,
        expected: &'static str,
    },
    /// The cell is readable but not one of the allowed values.
    #[error("{field}: '{raw}' is not one of {}", .allowed.join(", "))]
    Value {
        field: OrderField,
        raw: String,
        allowed: &'static [&'static str],
    },
    /// The cell breaks a table constraint such as order id uniqueness.
    #[error("{field}: '{raw}' {reason}")]
    Constraint {
        field: OrderField,
        raw: String,
        reason: &'static str,
    },
}

impl FieldError {
    pub fn field(&self) -> OrderField {
        match self {
            FieldError::Type { field, .. }
            | FieldError::Value { field, .. }
            | FieldError::Constraint { field, .. } => *field,
        }
    }
}

/// Positional row paired with the column layout it came from.
struct RowView<'r> {
    row: &'r [String],
    columns: &'r ResolvedColumns,
}

impl<'r> RowView<'r> {
    fn cell(&self, field: OrderField) -> &'r str {
        self.columns
            .index_of(field)
            .and_then(|index| self.row.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn count(&self, field: OrderField, errors: &mut Vec<FieldError>) -> Option<u32> {
        parse_typed(
            field,
            self.cell(field),
            coerce::COUNT,
            coerce::parse_count,
            errors,
        )
    }
}

/// Validates one positional row against resolved columns.
pub fn validate_row(
    row: &[String],
    columns: &ResolvedColumns,
) -> Result<OrderRecord, Vec<FieldError>> {
    let view = RowView { row, columns };
    let mut errors = Vec::new();

    let order_id = view.cell(OrderField::OrderId).trim().to_string();
    if order_id.is_empty() {
        errors.push(FieldError::Constraint {
            field: OrderField::OrderId,
            raw: order_id.clone(),
            reason: "must be a non-empty order id",
        });
    }

    let customer_type = parse_enum(
        OrderField::CustomerType,
        view.cell(OrderField::CustomerType),
        CustomerType::ALLOWED,
        CustomerType::parse,
        &mut errors,
    );
    let order_value = parse_typed(
        OrderField::OrderValue,
        view.cell(OrderField::OrderValue),
        coerce::AMOUNT,
        coerce::parse_amount,
        &mut errors,
    );
    let discount_used = parse_typed(
        OrderField::DiscountUsed,
        view.cell(OrderField::DiscountUsed),
        coerce::BOOLEAN,
        coerce::parse_flag,
        &mut errors,
    );
    let past_edits = view.count(OrderField::PastEdits, &mut errors);
    let past_cancels = view.count(OrderField::PastCancels, &mut errors);
    let shipping_speed = parse_enum(
        OrderField::ShippingSpeed,
        view.cell(OrderField::ShippingSpeed),
        ShippingSpeed::ALLOWED,
        ShippingSpeed::parse,
        &mut errors,
    );
    let minutes_since_checkout = view.count(OrderField::MinutesSinceCheckout, &mut errors);
    let address_change_requests = view.count(OrderField::AddressChangeRequests, &mut errors);

    let industry_raw = view.cell(OrderField::Industry);
    let industry = if industry_raw.trim().is_empty() {
        None
    } else {
        parse_enum(
            OrderField::Industry,
            industry_raw,
            Industry::ALLOWED,
            Industry::parse,
            &mut errors,
        )
    };

    match (
        customer_type,
        order_value,
        discount_used,
        past_edits,
        past_cancels,
        shipping_speed,
        minutes_since_checkout,
        address_change_requests,
    ) {
        (
            Some(customer_type),
            Some(order_value),
            Some(discount_used),
            Some(past_edits),
            Some(past_cancels),
            Some(shipping_speed),
            Some(minutes_since_checkout),
            Some(address_change_requests),
        ) if errors.is_empty() => Ok(OrderRecord {
            order_id,
            customer_type,
            order_value,
            discount_used,
            past_edits,
            past_cancels,
            shipping_speed,
            minutes_since_checkout,
            address_change_requests,
            industry,
        }),
        _ => Err(errors),
    }
}

fn parse_typed<T>(
    field: OrderField,
    raw: &str,
    expected: &'static str,
    parse: fn(&str) -> Option<T>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let parsed = parse(raw);
    if parsed.is_none() {
        errors.push(FieldError::Type {
            field,
            raw: raw.to_string(),
            expected,
        });
    }
    parsed
}

fn parse_enum<T>(
    field: OrderField,
    raw: &str,
    allowed: &'static [&'static str],
    parse: fn(&str) -> Option<T>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let parsed = parse(raw);
    if parsed.is_none() {
        errors.push(FieldError::Value {
            field,
            raw: raw.to_string(),
            allowed,
        });
    }
    parsed
}
