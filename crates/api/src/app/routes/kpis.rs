use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::dto;
use crate::app::services::AppServices;

/// Daily trend; a missing or unrecognised `range` yields 30 days.
pub async fn get_kpis(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::KpiQuery>,
) -> axum::response::Response {
    let range = query.range.unwrap_or_default();
    let items = services
        .queries()
        .kpis(&range)
        .iter()
        .map(dto::kpi_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// Totals, fill rate and status counts over the filtered product set.
pub async fn get_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ProductQuery>,
) -> axum::response::Response {
    let summary = services.queries().summary(&query.to_filter());
    (StatusCode::OK, Json(summary)).into_response()
}
