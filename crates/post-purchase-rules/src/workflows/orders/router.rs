use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::batch::BatchRunner;
use super::domain::{CustomerType, EditWindow, Industry, ShippingSpeed};
use super::import::OrderCsvImporter;
use super::schema::{ColumnMapping, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};
use super::table::RawTable;
use super::template::template_csv;
use crate::error::AppError;

/// Scoring request. Exactly one of `csv` or `rows` carries the orders.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub rows: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub column_map: ColumnMapping,
}

impl RecommendationRequest {
    fn into_table(self) -> Result<(RawTable, ColumnMapping), AppError> {
        let table = match (self.csv, self.rows) {
            (Some(csv), None) => OrderCsvImporter::from_reader(csv.as_bytes())?,
            (None, Some(rows)) => RawTable::from_json_rows(&rows),
            _ => {
                return Err(AppError::BadRequest(
                    "provide exactly one of `csv` or `rows`".to_string(),
                ))
            }
        };
        Ok((table, self.column_map))
    }
}

/// Router builder exposing the scoring, template and schema endpoints.
pub fn recommendation_router(runner: Arc<BatchRunner>) -> Router {
    Router::new()
        .route("/api/v1/orders/recommendations", post(recommend_handler))
        .route("/api/v1/orders/template", get(template_handler))
        .route("/api/v1/orders/schema", get(schema_handler))
        .with_state(runner)
}

pub(crate) async fn recommend_handler(
    State(runner): State<Arc<BatchRunner>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => return AppError::BadRequest(rejection.body_text()).into_response(),
    };

    let (table, mapping) = match request.into_table() {
        Ok(parts) => parts,
        Err(error) => return error.into_response(),
    };

    match runner.run(&table, &mapping) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn template_handler() -> Response {
    match template_csv() {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"orders_template.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn schema_handler(State(runner): State<Arc<BatchRunner>>) -> Response {
    let windows: Vec<u8> = EditWindow::ordered()
        .into_iter()
        .map(|window| window.minutes())
        .collect();
    let payload = json!({
        "required_columns": REQUIRED_COLUMNS,
        "optional_columns": OPTIONAL_COLUMNS,
        "allowed_values": {
            "customer_type": CustomerType::ALLOWED,
            "shipping_speed": ShippingSpeed::ALLOWED,
            "industry": Industry::ALLOWED,
            "discount_used": ["0", "1", "true", "false"],
        },
        "edit_windows": windows,
        "config": runner.engine().config(),
        "rules": runner.engine().catalog(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}
