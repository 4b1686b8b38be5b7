use crate::infra::RuleOverrides;
use crate::orders::render_summary;
use clap::Args;
use post_purchase_rules::config::AppConfig;
use post_purchase_rules::error::AppError;
use post_purchase_rules::workflows::orders::{
    generate_orders, orders_to_table, BatchReport, BatchRunner, ColumnMapping, Factor, ResultRow,
    RuleGroup,
};
use std::io::Write;

const PREVIEW_ROWS: usize = 10;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of synthetic orders to score
    #[arg(long, default_value_t = 200)]
    pub(crate) rows: usize,
    /// Seed for the synthetic generator
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,
    /// Print the full factor breakdown for one order, e.g. ORD-0007
    #[arg(long)]
    pub(crate) detail: Option<String>,
    #[command(flatten)]
    pub(crate) rules: RuleOverrides,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let runner = BatchRunner::new(args.rules.apply(config.rules));

    let orders = generate_orders(args.rows, args.seed);
    let report = runner.run(&orders_to_table(&orders), &ColumnMapping::new())?;

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "Post-purchase rules demo ({} synthetic orders, seed {})",
        args.rows, args.seed
    )?;
    render_summary(&mut out, &report.summary)?;
    render_preview(&mut out, &report)?;

    if let Some(order_id) = args.detail.as_deref() {
        match report.row(order_id) {
            Some(row) => render_detail(&mut out, row)?,
            None => writeln!(out, "\nNo order '{}' in this batch", order_id)?,
        }
    }

    Ok(())
}

fn render_preview<W: Write>(out: &mut W, report: &BatchReport) -> std::io::Result<()> {
    writeln!(out, "\nFirst {} orders", PREVIEW_ROWS.min(report.rows.len()))?;
    writeln!(
        out,
        "{:<10} {:<10} {:>8} {:>6} {:<6} {:<6} {:<6} explanation",
        "order", "customer", "value", "window", "upsell", "strict", "lock"
    )?;
    for row in report.rows.iter().take(PREVIEW_ROWS) {
        writeln!(
            out,
            "{:<10} {:<10} {:>8.2} {:>6} {:<6} {:<6} {:<6} {}",
            row.order.order_id,
            row.order.customer_type,
            row.order.order_value,
            row.edit_window_minutes,
            yes_no(row.show_upsell),
            yes_no(row.strict_address_validation),
            yes_no(row.lock_order_early),
            row.explanation.combined
        )?;
    }
    Ok(())
}

fn render_detail<W: Write>(out: &mut W, row: &ResultRow) -> std::io::Result<()> {
    let order = &row.order;
    writeln!(out, "\nOrder {}", order.order_id)?;
    writeln!(
        out,
        "  {} | ${:.2} | discount {} | {} past edits | {} past cancels | {} shipping",
        order.customer_type,
        order.order_value,
        yes_no(order.discount_used),
        order.past_edits,
        order.past_cancels,
        order.shipping_speed
    )?;
    writeln!(
        out,
        "  {} min since checkout | {} address change requests",
        order.minutes_since_checkout, order.address_change_requests
    )?;

    let decisions = &row.decisions;
    let groups: [(&str, String, &[Factor], &str); 4] = [
        (
            RuleGroup::EditWindow.label(),
            format!("{} min", row.edit_window_minutes),
            decisions.edit_window.factors.as_slice(),
            row.explanation.edit_window.as_str(),
        ),
        (
            RuleGroup::ShowUpsell.label(),
            yes_no(row.show_upsell).to_string(),
            decisions.show_upsell.factors.as_slice(),
            row.explanation.show_upsell.as_str(),
        ),
        (
            RuleGroup::StrictAddressValidation.label(),
            yes_no(row.strict_address_validation).to_string(),
            decisions.strict_address_validation.factors.as_slice(),
            row.explanation.strict_address_validation.as_str(),
        ),
        (
            RuleGroup::LockOrderEarly.label(),
            yes_no(row.lock_order_early).to_string(),
            decisions.lock_order_early.factors.as_slice(),
            row.explanation.lock_order_early.as_str(),
        ),
    ];

    for (name, value, factors, explanation) in groups {
        writeln!(out, "  {}: {} ({})", name, value, explanation)?;
        for factor in factors {
            writeln!(
                out,
                "    - {} (weight {}, rank {})",
                factor.label, factor.weight, factor.rank
            )?;
        }
    }
    if row.window_expired {
        writeln!(out, "  Edit window already expired at scoring time")?;
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
