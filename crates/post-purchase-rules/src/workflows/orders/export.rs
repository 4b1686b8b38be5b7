use super::batch::{BatchReport, ResultRow};
use super::domain::OrderRecord;
use super::schema::{OrderField, REQUIRED_COLUMNS};
use std::io::Write;

/// Decision and explanation columns appended after the input columns.
pub const RESULT_COLUMNS: [&str; 10] = [
    "edit_window_minutes",
    "show_upsell",
    "strict_address_validation",
    "lock_order_early",
    "window_expired",
    "explanation",
    "edit_window_reason",
    "upsell_reason",
    "address_reason",
    "lock_reason",
];

pub(crate) fn canonical_cells(order: &OrderRecord) -> Vec<String> {
    vec![
        order.order_id.clone(),
        order.customer_type.to_string(),
        order.order_value.to_string(),
        if order.discount_used { "1" } else { "0" }.to_string(),
        order.past_edits.to_string(),
        order.past_cancels.to_string(),
        order.shipping_speed.to_string(),
        order.minutes_since_checkout.to_string(),
        order.address_change_requests.to_string(),
    ]
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

/// Writes scored rows as CSV: canonical columns, `industry` when any row carries one,
/// passthrough columns, then [`RESULT_COLUMNS`].
pub fn write_results<W: Write>(writer: W, report: &BatchReport) -> Result<(), csv::Error> {
    let with_industry = report.rows.iter().any(|row| row.order.industry.is_some());
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .collect();
    if with_industry {
        header.push(OrderField::Industry.name().to_string());
    }
    header.extend(report.extra_columns.iter().map(|column| passthrough_header(column)));
    header.extend(RESULT_COLUMNS.iter().map(|column| column.to_string()));
    csv_writer.write_record(&header)?;

    for row in &report.rows {
        csv_writer.write_record(result_cells(row, with_industry, &report.extra_columns))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Passthrough columns sharing a name with a generated column are written as
/// `input_<name>` so every header stays unique.
fn passthrough_header(column: &str) -> String {
    let reserved = REQUIRED_COLUMNS
        .iter()
        .chain(RESULT_COLUMNS.iter())
        .any(|name| *name == column)
        || column == OrderField::Industry.name();
    if reserved {
        format!("input_{column}")
    } else {
        column.to_string()
    }
}

fn result_cells(row: &ResultRow, with_industry: bool, extra_columns: &[String]) -> Vec<String> {
    let mut cells = canonical_cells(&row.order);
    if with_industry {
        cells.push(
            row.order
                .industry
                .map(|industry| industry.to_string())
                .unwrap_or_default(),
        );
    }
    for column in extra_columns {
        let value = row
            .extra_columns
            .iter()
            .find(|(header, _)| header == column)
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        cells.push(value);
    }
    cells.extend([
        row.edit_window_minutes.to_string(),
        yes_no(row.show_upsell),
        yes_no(row.strict_address_validation),
        yes_no(row.lock_order_early),
        yes_no(row.window_expired),
        row.explanation.combined.clone(),
        row.explanation.edit_window.clone(),
        row.explanation.show_upsell.clone(),
        row.explanation.strict_address_validation.clone(),
        row.explanation.lock_order_early.clone(),
    ]);
    cells
}
