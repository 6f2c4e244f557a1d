//! Chart API endpoints - Monthly series as chart payloads

use crate::routes::params::{parse_year, today};
use crate::{ApiError, AppState};
use axum::extract::{Path, Query};
use axum::Json;
use salesboard_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use salesboard_core::{ChartData, Metric};
use serde::Serialize;
use std::collections::HashMap;

/// One chart, or the reason it could not be built
#[derive(Debug, Serialize)]
pub struct MetricChart {
    pub metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub year: i32,
    pub charts: Vec<MetricChart>,
}

/// All four monthly charts for a year (JSON API)
///
/// A failing metric is reported in its own entry; the others are still returned.
pub async fn api_charts(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Json<ChartsResponse> {
    let year = parse_year(&params, today());
    let charts = state
        .service
        .all_monthly_charts(year)
        .await
        .into_iter()
        .map(|(metric, result)| match result {
            Ok(chart) => MetricChart {
                metric,
                chart: Some(chart),
                error: None,
            },
            Err(e) => {
                let context = ErrorContext::new("api_charts")
                    .with_data("metric", serde_json::json!(metric.to_string()))
                    .with_data("year", serde_json::json!(year));
                DefaultErrorLogger.log_error(&e, &context);
                MetricChart {
                    metric,
                    chart: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    Json(ChartsResponse { year, charts })
}

/// One monthly chart (JSON API)
pub async fn api_chart_metric(
    state: axum::extract::State<AppState>,
    path: Path<String>,
    params: Query<HashMap<String, String>>,
) -> Result<Json<ChartData>, ApiError> {
    let year = parse_year(&params, today());
    let context = ErrorContext::new("api_chart_metric")
        .with_data("metric", serde_json::json!(path.0))
        .with_data("year", serde_json::json!(year));

    let metric: Metric = path.0.parse().map_err(|e| ApiError::from_core(e, &context))?;
    let chart = state
        .service
        .monthly_chart(year, metric)
        .await
        .map_err(|e| ApiError::from_core(e, &context))?;
    Ok(Json(chart))
}
