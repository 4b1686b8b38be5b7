use super::common::*;
use crate::workflows::orders::domain::EditWindow;
use crate::workflows::orders::{
    write_results, ColumnMapping, FieldError, OrderCsvImporter, OrderField, RawTable, SchemaError,
    REQUIRED_COLUMNS,
};
use std::io::Cursor;

#[test]
fn bad_cell_rejects_only_its_row() {
    let mut bad = GOOD_ROW;
    bad[0] = "A-102";
    bad[8] = "bad";
    let table = canonical_table(&[GOOD_ROW, bad, FRAUD_ROW]);

    let report = runner()
        .run(&table, &ColumnMapping::new())
        .expect("columns resolve");

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].order.order_id, "A-100");
    assert_eq!(report.rows[1].order.order_id, "A-101");
    assert_eq!(report.rejected.len(), 1);

    let diagnostic = &report.rejected[0];
    assert_eq!(diagnostic.row_number, 2);
    assert_eq!(diagnostic.order_id.as_deref(), Some("A-102"));
    assert_eq!(
        diagnostic.errors,
        vec![FieldError::Type {
            field: OrderField::AddressChangeRequests,
            raw: "bad".to_string(),
            expected: "a non-negative integer",
        }]
    );

    let alone = runner()
        .run(&canonical_table(&[FRAUD_ROW]), &ColumnMapping::new())
        .expect("columns resolve");
    assert_eq!(alone.rows[0], report.rows[1]);
}

#[test]
fn every_bad_cell_in_a_row_is_reported() {
    let row = [
        "", "returning", "-5", "maybe", "1.5", "0", "drone", "10", "0",
    ];

    let report = runner()
        .run(&canonical_table(&[row]), &ColumnMapping::new())
        .expect("columns resolve");

    assert!(report.rows.is_empty());
    let fields: Vec<OrderField> = report.rejected[0]
        .errors
        .iter()
        .map(FieldError::field)
        .collect();
    assert_eq!(
        fields,
        vec![
            OrderField::OrderId,
            OrderField::CustomerType,
            OrderField::OrderValue,
            OrderField::DiscountUsed,
            OrderField::PastEdits,
            OrderField::ShippingSpeed,
        ]
    );
    assert!(matches!(
        report.rejected[0].errors[1],
        FieldError::Value { ref raw, .. } if raw == "returning"
    ));
    assert_eq!(report.rejected[0].order_id, None);
}

#[test]
fn duplicate_order_ids_keep_the_first_occurrence() {
    let mut duplicate = FRAUD_ROW;
    duplicate[0] = "A-100";
    let report = runner()
        .run(
            &canonical_table(&[GOOD_ROW, duplicate]),
            &ColumnMapping::new(),
        )
        .expect("columns resolve");

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].order.order_value, 42.5);
    assert_eq!(report.rejected[0].row_number, 2);
    assert!(matches!(
        report.rejected[0].errors[0],
        FieldError::Constraint {
            field: OrderField::OrderId,
            ..
        }
    ));
}

#[test]
fn missing_column_fails_the_whole_batch() {
    let mut table = canonical_table(&[GOOD_ROW]);
    table.headers.truncate(7);
    for row in &mut table.rows {
        row.truncate(7);
    }

    let error = runner()
        .run(&table, &ColumnMapping::new())
        .expect_err("batch-level failure");

    assert_eq!(
        error,
        SchemaError::MissingColumns {
            missing: vec![
                OrderField::MinutesSinceCheckout,
                OrderField::AddressChangeRequests
            ]
        }
    );
}

#[test]
fn summary_reports_rates_over_scored_rows() {
    let mut vip = GOOD_ROW;
    vip[0] = "A-103";
    vip[1] = "vip";
    vip[2] = "120";
    let mut broken = GOOD_ROW;
    broken[0] = "A-104";
    broken[6] = "overnight";

    let report = runner()
        .run(
            &canonical_table(&[GOOD_ROW, FRAUD_ROW, vip, broken]),
            &ColumnMapping::new(),
        )
        .expect("columns resolve");

    let summary = &report.summary;
    assert_eq!(summary.total_orders, 3);
    assert_eq!(summary.rejected_rows, 1);
    assert!((summary.pct_upsell - 100.0 / 3.0).abs() < 1e-9);
    assert!((summary.pct_lock_early - 100.0 / 3.0).abs() < 1e-9);
    assert!((summary.avg_window - (15.0 + 10.0 + 30.0) / 3.0).abs() < 1e-9);
    assert_eq!(summary.expired_windows, 0);
}

#[test]
fn empty_table_scores_nothing() {
    let report = runner()
        .run(&canonical_table(&[]), &ColumnMapping::new())
        .expect("columns resolve");

    assert!(report.rows.is_empty());
    assert_eq!(report.summary.pct_upsell, 0.0);
    assert_eq!(report.summary.avg_window, 0.0);
}

#[test]
fn mapped_columns_and_extras_flow_into_the_export() {
    let csv = "Order Ref,customer_type,order_value,discount_used,past_edits,past_cancels,\
               shipping_speed,minutes_since_checkout,address_change_requests,Channel\n\
               X-1,VIP,50,false,0,0,standard,30,0,web\n";
    let table: RawTable = OrderCsvImporter::from_reader(Cursor::new(csv)).expect("csv parses");
    let mapping = ColumnMapping::new().with("order_id", "Order Ref");

    let report = runner().run(&table, &mapping).expect("columns resolve");
    assert_eq!(report.extra_columns, vec!["Channel"]);
    assert_eq!(report.rows[0].edit_window_minutes, EditWindow::Thirty);

    let mut out = Vec::new();
    write_results(&mut out, &report).expect("export writes");
    let text = String::from_utf8(out).expect("utf-8");
    let mut lines = text.lines();

    let header = lines.next().expect("header");
    assert!(header.starts_with("order_id,customer_type,"));
    assert!(header.contains(",Channel,edit_window_minutes,show_upsell,"));
    assert!(header.ends_with("upsell_reason,address_reason,lock_reason"));

    let row = lines.next().expect("row");
    assert!(row.starts_with("X-1,vip,50,0,0,0,standard,30,0,web,30,No,No,No,No,VIP customer,"));
    assert!(lines.next().is_none());
}

#[test]
fn undecodable_bytes_only_affect_their_own_row() {
    let mut data = format!("{},note\n{},ok\n", REQUIRED_COLUMNS.join(","), GOOD_ROW.join(","))
        .into_bytes();
    data.extend_from_slice(b"A-102,repeat,4");
    data.push(0xe9);
    data.extend_from_slice(b",0,0,0,standard,12,0,caf");
    data.push(0xe9);
    data.extend_from_slice(b"\nA-103,vip,50,0,0,0,standard,30,0,plain\n");

    let table = OrderCsvImporter::from_reader(&data[..]).expect("import tolerates bad bytes");
    let report = runner()
        .run(&table, &ColumnMapping::new())
        .expect("columns resolve");

    let scored: Vec<&str> = report
        .rows
        .iter()
        .map(|row| row.order.order_id.as_str())
        .collect();
    assert_eq!(scored, vec!["A-100", "A-103"]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].order_id.as_deref(), Some("A-102"));
    assert_eq!(
        report.rejected[0].errors[0].field(),
        OrderField::OrderValue
    );
}

#[test]
fn remapped_order_id_keeps_the_literal_column_under_a_distinct_header() {
    let csv = "Ref,order_id,customer_type,order_value,discount_used,past_edits,past_cancels,\
               shipping_speed,minutes_since_checkout,address_change_requests\n\
               R-1,legacy-9,repeat,40,0,0,0,standard,5,0\n";
    let table = OrderCsvImporter::from_reader(Cursor::new(csv)).expect("csv parses");
    let mapping = ColumnMapping::new().with("order_id", "Ref");

    let report = runner().run(&table, &mapping).expect("columns resolve");
    assert_eq!(report.rows[0].order.order_id, "R-1");
    assert_eq!(report.extra_columns, vec!["order_id"]);

    let mut out = Vec::new();
    write_results(&mut out, &report).expect("export writes");
    let text = String::from_utf8(out).expect("utf-8");
    let header: Vec<&str> = text.lines().next().expect("header").split(',').collect();

    assert_eq!(header.iter().filter(|name| **name == "order_id").count(), 1);
    assert_eq!(header[9], "input_order_id");
    assert!(text.lines().nth(1).expect("row").starts_with("R-1,repeat,40,0,0,0,standard,5,0,legacy-9,"));
}
