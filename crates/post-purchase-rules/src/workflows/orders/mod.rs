//! Post-purchase recommendations for order exports.
//!
//! Rows flow through [`schema`] validation, the [`RuleEngine`], and the
//! [`ExplanationComposer`]; [`BatchRunner`] ties the three together for a whole
//! table. CSV import/export, the downloadable template and an HTTP router sit on
//! top of that pipeline.

pub mod batch;
pub mod domain;
pub(crate) mod evaluation;
pub mod explanation;
pub mod export;
pub mod import;
pub mod router;
pub mod schema;
pub mod table;
pub mod template;

#[cfg(test)]
mod tests;

pub use batch::{BatchReport, BatchRunner, BatchSummary, ResultRow, RowDiagnostic};
pub use domain::{
    CustomerType, EditWindow, Industry, InvalidEditWindow, OrderRecord, ShippingSpeed,
};
pub use evaluation::{
    Decision, Evaluation, Factor, RuleDescriptor, RuleEngine, RuleGroup, RulesConfig,
};
pub use explanation::{ExplanationComposer, Explanations};
pub use export::{write_results, RESULT_COLUMNS};
pub use import::{OrderCsvImporter, OrderImportError};
pub use router::recommendation_router;
pub use schema::{
    validate_row, ColumnMapping, FieldError, OrderField, ResolvedColumns, SchemaError,
    OPTIONAL_COLUMNS, REQUIRED_COLUMNS,
};
pub use table::RawTable;
pub use template::{generate_orders, orders_to_table, template_csv, write_orders};
