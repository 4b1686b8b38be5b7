use super::domain::{EditWindow, OrderRecord};
use super::evaluation::{Evaluation, RuleEngine, RulesConfig};
use super::explanation::{ExplanationComposer, Explanations};
use super::schema::{validate_row, ColumnMapping, FieldError, OrderField, SchemaError};
use super::table::RawTable;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

/// Applies validation, the rule engine and the explanation composer to every row of
/// a table, keeping input order.
pub struct BatchRunner {
    engine: RuleEngine,
    composer: ExplanationComposer,
}

impl BatchRunner {
    pub fn new(config: RulesConfig) -> Self {
        Self::with_engine(RuleEngine::new(config))
    }

    pub fn with_engine(engine: RuleEngine) -> Self {
        Self {
            engine,
            composer: ExplanationComposer,
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Scores a single validated order.
    pub fn score(&self, order: OrderRecord) -> ResultRow {
        self.score_with_extras(order, Vec::new())
    }

    fn score_with_extras(
        &self,
        order: OrderRecord,
        extra_columns: Vec<(String, String)>,
    ) -> ResultRow {
        let evaluation = self.engine.evaluate(&order);
        let explanation = self.composer.explain(&evaluation);
        ResultRow {
            edit_window_minutes: evaluation.edit_window.value,
            show_upsell: evaluation.show_upsell.value,
            strict_address_validation: evaluation.strict_address_validation.value,
            lock_order_early: evaluation.lock_order_early.value,
            window_expired: evaluation.window_expired(&order),
            explanation,
            decisions: evaluation,
            extra_columns,
            order,
        }
    }

    /// Scores a whole table.
    ///
    /// Fails only when a required column cannot be located. Rows with bad values are
    /// left out of `rows` and reported in `rejected`; the remaining rows are scored
    /// exactly as they would be on their own.
    pub fn run(
        &self,
        table: &RawTable,
        mapping: &ColumnMapping,
    ) -> Result<BatchReport, SchemaError> {
        let columns = mapping.resolve(&table.headers)?;

        let mut rows = Vec::with_capacity(table.len());
        let mut rejected = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::with_capacity(table.len());

        for (index, cells) in table.rows.iter().enumerate() {
            let row_number = index + 1;
            let order = match validate_row(cells, &columns) {
                Ok(order) => order,
                Err(errors) => {
                    let order_id = columns
                        .index_of(OrderField::OrderId)
                        .and_then(|column| cells.get(column))
                        .map(|raw| raw.trim().to_string())
                        .filter(|raw| !raw.is_empty());
                    rejected.push(RowDiagnostic::new(row_number, order_id, errors));
                    continue;
                }
            };

            if !seen_ids.insert(order.order_id.clone()) {
                rejected.push(RowDiagnostic::new(
                    row_number,
                    Some(order.order_id.clone()),
                    vec![FieldError::Constraint {
                        field: OrderField::OrderId,
                        raw: order.order_id.clone(),
                        reason: "duplicates an earlier order id in this batch",
                    }],
                ));
                continue;
            }

            let extras = columns.passthrough_values(cells);
            rows.push(self.score_with_extras(order, extras));
        }

        for diagnostic in &rejected {
            warn!(
                row = diagnostic.row_number,
                order_id = diagnostic.order_id.as_deref().unwrap_or("-"),
                errors = diagnostic.errors.len(),
                "order row rejected: {}",
                diagnostic
            );
        }

        let summary = BatchSummary::from_rows(&rows, rejected.len());
        info!(
            total_orders = summary.total_orders,
            rejected_rows = summary.rejected_rows,
            avg_window = summary.avg_window,
            "order batch scored"
        );

        Ok(BatchReport {
            extra_columns: columns
                .passthrough_headers()
                .into_iter()
                .map(str::to_string)
                .collect(),
            rows,
            rejected,
            summary,
        })
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

/// One scored order: the validated record, the four decision values and their
/// explanations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(flatten)]
    pub order: OrderRecord,
    pub edit_window_minutes: EditWindow,
    pub show_upsell: bool,
    pub strict_address_validation: bool,
    pub lock_order_early: bool,
    pub window_expired: bool,
    pub explanation: Explanations,
    pub decisions: Evaluation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_columns: Vec<(String, String)>,
}

/// Why a row was left out of the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiagnostic {
    /// 1-based position among the data rows.
    pub row_number: usize,
    pub order_id: Option<String>,
    pub errors: Vec<FieldError>,
}

impl RowDiagnostic {
    fn new(row_number: usize, order_id: Option<String>, errors: Vec<FieldError>) -> Self {
        Self {
            row_number,
            order_id,
            errors,
        }
    }
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        match &self.order_id {
            Some(order_id) => write!(f, "row {} ({}): {}", self.row_number, order_id, details),
            None => write!(f, "row {}: {}", self.row_number, details),
        }
    }
}

/// Headline rates across the scored rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_orders: usize,
    pub rejected_rows: usize,
    pub pct_upsell: f64,
    pub avg_window: f64,
    pub pct_lock_early: f64,
    pub pct_strict_address: f64,
    pub expired_windows: usize,
}

impl BatchSummary {
    pub fn from_rows(rows: &[ResultRow], rejected_rows: usize) -> Self {
        let total_orders = rows.len();
        let pct = |count: usize| {
            if total_orders == 0 {
                0.0
            } else {
                count as f64 / total_orders as f64 * 100.0
            }
        };

        let upsell = rows.iter().filter(|row| row.show_upsell).count();
        let lock = rows.iter().filter(|row| row.lock_order_early).count();
        let strict = rows
            .iter()
            .filter(|row| row.strict_address_validation)
            .count();
        let window_total: u64 = rows
            .iter()
            .map(|row| u64::from(row.edit_window_minutes.minutes()))
            .sum();

        Self {
            total_orders,
            rejected_rows,
            pct_upsell: pct(upsell),
            avg_window: if total_orders == 0 {
                0.0
            } else {
                window_total as f64 / total_orders as f64
            },
            pct_lock_early: pct(lock),
            pct_strict_address: pct(strict),
            expired_windows: rows.iter().filter(|row| row.window_expired).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub rows: Vec<ResultRow>,
    pub rejected: Vec<RowDiagnostic>,
    pub summary: BatchSummary,
    /// Input columns outside the schema, carried through in table order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_columns: Vec<String>,
}

impl BatchReport {
    pub fn row(&self, order_id: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|row| row.order.order_id == order_id)
    }
}
