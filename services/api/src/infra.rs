use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use post_purchase_rules::error::AppError;
use post_purchase_rules::workflows::orders::{EditWindow, Industry, RulesConfig};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Command-line overrides layered on top of the `RULES_*` configuration.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RuleOverrides {
    /// Add the conservative risk rules to the address and lock groups
    #[arg(long)]
    pub(crate) conservative: bool,
    /// Never recommend an upsell prompt
    #[arg(long)]
    pub(crate) disable_upsell: bool,
    /// Category signal for rows without an industry column
    #[arg(long, value_parser = parse_industry)]
    pub(crate) industry: Option<Industry>,
    /// Window used when no edit-window rule matches (10, 15, 20, 25 or 30)
    #[arg(long, value_parser = parse_window)]
    pub(crate) default_window: Option<EditWindow>,
}

impl RuleOverrides {
    pub(crate) fn apply(&self, mut config: RulesConfig) -> RulesConfig {
        if self.conservative {
            config.conservative = true;
        }
        if self.disable_upsell {
            config.enable_upsell = false;
        }
        if let Some(industry) = self.industry {
            config.default_industry = Some(industry);
        }
        if let Some(window) = self.default_window {
            config.default_window = window;
        }
        config
    }
}

pub(crate) fn parse_window(raw: &str) -> Result<EditWindow, String> {
    let minutes: u32 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as minutes ({err})"))?;
    EditWindow::try_from(minutes).map_err(|err| err.to_string())
}

pub(crate) fn parse_industry(raw: &str) -> Result<Industry, String> {
    Industry::parse(raw).ok_or_else(|| {
        format!(
            "unknown industry '{raw}' (expected one of {})",
            Industry::ALLOWED.join(", ")
        )
    })
}

/// Buffered file writer, or stdout when no path is given.
pub(crate) fn output_writer(path: Option<&Path>) -> Result<Box<dyn Write>, AppError> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}
