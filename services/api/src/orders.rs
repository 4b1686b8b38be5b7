use crate::infra::{output_writer, RuleOverrides};
use clap::Args;
use post_purchase_rules::config::AppConfig;
use post_purchase_rules::error::AppError;
use post_purchase_rules::telemetry;
use post_purchase_rules::workflows::orders::{
    generate_orders, template_csv, write_orders, write_results, BatchReport, BatchRunner,
    BatchSummary, ColumnMapping, OrderCsvImporter,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Order CSV to score
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the scored CSV (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Point a schema field at a differently named column, e.g. order_value="Cart Total"
    #[arg(long, value_parser = ColumnMapping::parse_pair)]
    pub(crate) map: Vec<(String, String)>,
    #[command(flatten)]
    pub(crate) rules: RuleOverrides,
    /// List every rejected row with its field errors
    #[arg(long)]
    pub(crate) show_rejected: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TemplateArgs {
    /// Where to write the template (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Number of orders to generate
    #[arg(long, default_value_t = 200)]
    pub(crate) rows: usize,
    /// Seed for the generator; the same seed always yields the same orders
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,
    /// Where to write the orders (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        output,
        map,
        rules,
        show_rejected,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let table = OrderCsvImporter::from_path(&input)?;
    let runner = BatchRunner::new(rules.apply(config.rules));
    let report = runner.run(&table, &ColumnMapping::from_pairs(map))?;

    let mut writer = output_writer(output.as_deref())?;
    write_results(&mut writer, &report)?;
    writer.flush()?;

    let mut stderr = std::io::stderr().lock();
    render_summary(&mut stderr, &report.summary)?;
    render_rejections(&mut stderr, &report, show_rejected)?;
    Ok(())
}

pub(crate) fn run_template(args: TemplateArgs) -> Result<(), AppError> {
    let mut writer = output_writer(args.output.as_deref())?;
    writer.write_all(template_csv()?.as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let orders = generate_orders(args.rows, args.seed);
    let mut writer = output_writer(args.output.as_deref())?;
    write_orders(&mut writer, &orders)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn render_summary<W: Write>(out: &mut W, summary: &BatchSummary) -> std::io::Result<()> {
    writeln!(out, "Scored {} orders", summary.total_orders)?;
    writeln!(out, "- Upsell prompts: {:.1}%", summary.pct_upsell)?;
    writeln!(out, "- Average edit window: {:.1} min", summary.avg_window)?;
    writeln!(out, "- Early lock: {:.1}%", summary.pct_lock_early)?;
    writeln!(
        out,
        "- Strict address validation: {:.1}%",
        summary.pct_strict_address
    )?;
    writeln!(
        out,
        "- Windows already expired at scoring time: {}",
        summary.expired_windows
    )
}

fn render_rejections<W: Write>(
    out: &mut W,
    report: &BatchReport,
    show_rejected: bool,
) -> std::io::Result<()> {
    if report.rejected.is_empty() {
        return Ok(());
    }

    writeln!(out, "Rejected {} rows", report.rejected.len())?;
    if show_rejected {
        for diagnostic in &report.rejected {
            writeln!(out, "  - {}", diagnostic)?;
        }
    } else {
        writeln!(out, "  (pass --show-rejected to list them)")?;
    }
    Ok(())
}
