use super::domain::{CustomerType, OrderRecord, ShippingSpeed};
use super::export::canonical_cells;
use super::import::OrderImportError;
use super::schema::REQUIRED_COLUMNS;
use super::table::RawTable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

pub const TEMPLATE_ROWS: usize = 5;
pub const TEMPLATE_SEED: u64 = 123;

const CUSTOMER_MIX: &[(CustomerType, u32)] = &[
    (CustomerType::FirstTime, 45),
    (CustomerType::Repeat, 45),
    (CustomerType::Vip, 10),
];
const SHIPPING_MIX: &[(ShippingSpeed, u32)] =
    &[(ShippingSpeed::Standard, 75), (ShippingSpeed::Express, 25)];
const DISCOUNT_MIX: &[(bool, u32)] = &[(false, 70), (true, 30)];
const PAST_EDITS_MIX: &[(u32, u32)] = &[(0, 60), (1, 25), (2, 12), (3, 3)];
const PAST_CANCELS_MIX: &[(u32, u32)] = &[(0, 85), (1, 12), (2, 3)];
const ADDRESS_CHANGES_MIX: &[(u32, u32)] = &[(0, 92), (1, 6), (2, 2)];
const ORDER_VALUE_SCALE: f64 = 50.0;
const ORDER_VALUE_FLOOR: f64 = 15.0;
const MAX_MINUTES_SINCE_CHECKOUT: u32 = 90;

/// Deterministic demo orders (`ORD-0001`, `ORD-0002`, ...). The same seed always
/// yields the same rows.
pub fn generate_orders(rows: usize, seed: u64) -> Vec<OrderRecord> {
    let mut rng = StdRng::seed_from_u64(seed);

    (1..=rows)
        .map(|index| {
            let customer_type = pick(&mut rng, CUSTOMER_MIX);
            let draw: f64 = rng.gen();
            let exponential = -ORDER_VALUE_SCALE * (1.0 - draw).ln();
            let order_value = ((exponential + ORDER_VALUE_FLOOR).clamp(10.0, 500.0) * 100.0)
                .round()
                / 100.0;

            OrderRecord {
                order_id: format!("ORD-{index:04}"),
                customer_type,
                order_value,
                discount_used: pick(&mut rng, DISCOUNT_MIX),
                past_edits: pick(&mut rng, PAST_EDITS_MIX),
                past_cancels: pick(&mut rng, PAST_CANCELS_MIX),
                shipping_speed: pick(&mut rng, SHIPPING_MIX),
                minutes_since_checkout: rng.gen_range(0..=MAX_MINUTES_SINCE_CHECKOUT),
                address_change_requests: pick(&mut rng, ADDRESS_CHANGES_MIX),
                industry: None,
            }
        })
        .collect()
}

fn pick<T: Copy>(rng: &mut StdRng, choices: &[(T, u32)]) -> T {
    let total: u32 = choices.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.gen_range(0..total);
    for (choice, weight) in choices {
        if roll < *weight {
            return *choice;
        }
        roll -= weight;
    }
    choices[choices.len() - 1].0
}

/// Canonical table for already-typed orders, e.g. synthetic demo data.
pub fn orders_to_table(orders: &[OrderRecord]) -> RawTable {
    RawTable::new(
        REQUIRED_COLUMNS.iter().map(|column| column.to_string()).collect(),
        orders.iter().map(canonical_cells).collect(),
    )
}

pub fn write_orders<W: Write>(writer: W, orders: &[OrderRecord]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REQUIRED_COLUMNS)?;
    for order in orders {
        csv_writer.write_record(canonical_cells(order))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Downloadable example input: the canonical header plus a handful of rows.
pub fn template_csv() -> Result<String, OrderImportError> {
    let mut buffer = Vec::new();
    write_orders(&mut buffer, &generate_orders(TEMPLATE_ROWS, TEMPLATE_SEED))?;
    String::from_utf8(buffer)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err).into())
}
