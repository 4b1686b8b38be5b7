use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::orders::domain::{CustomerType, OrderRecord, ShippingSpeed};
use crate::workflows::orders::schema::REQUIRED_COLUMNS;
use crate::workflows::orders::{recommendation_router, BatchRunner, RawTable, RulesConfig};

pub(super) fn vip_default() -> OrderRecord {
    OrderRecord {
        order_id: "ORD-VIP".to_string(),
        customer_type: CustomerType::Vip,
        order_value: 50.0,
        discount_used: false,
        past_edits: 0,
        past_cancels: 0,
        shipping_speed: ShippingSpeed::Standard,
        minutes_since_checkout: 30,
        address_change_requests: 0,
        industry: None,
    }
}

pub(super) fn fraud_pattern() -> OrderRecord {
    OrderRecord {
        order_id: "ORD-FRAUD".to_string(),
        customer_type: CustomerType::FirstTime,
        order_value: 60.0,
        discount_used: true,
        past_edits: 0,
        past_cancels: 0,
        shipping_speed: ShippingSpeed::Standard,
        minutes_since_checkout: 10,
        address_change_requests: 1,
        industry: None,
    }
}

pub(super) fn high_value_upsell() -> OrderRecord {
    OrderRecord {
        order_id: "ORD-UPSELL".to_string(),
        customer_type: CustomerType::Repeat,
        order_value: 89.0,
        discount_used: true,
        past_edits: 1,
        past_cancels: 0,
        shipping_speed: ShippingSpeed::Express,
        minutes_since_checkout: 5,
        address_change_requests: 0,
        industry: None,
    }
}

pub(super) fn runner() -> BatchRunner {
    BatchRunner::new(RulesConfig::default())
}

/// Canonical header plus the given rows, cells as typed by a collaborator.
pub(super) fn canonical_table(rows: &[[&str; 9]]) -> RawTable {
    RawTable::new(
        REQUIRED_COLUMNS.iter().map(|column| column.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
}

pub(super) const GOOD_ROW: [&str; 9] = [
    "A-100", "repeat", "42.50", "0", "0", "0", "standard", "12", "0",
];
pub(super) const FRAUD_ROW: [&str; 9] = [
    "A-101", "first_time", "60", "1", "0", "0", "standard", "10", "1",
];

pub(super) fn canonical_csv(rows: &[[&str; 9]]) -> String {
    let mut csv = REQUIRED_COLUMNS.join(",");
    csv.push('\n');
    for row in rows {
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

pub(super) fn router() -> axum::Router {
    recommendation_router(Arc::new(runner()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 payload")
}
