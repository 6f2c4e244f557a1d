//! Sales API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_sales: Filtered, paginated listing (JSON)
//! - api_summary: Dashboard totals (JSON)
//! - api_periods: Period and status options (JSON)
//! - htmx_sales_list: Listing table and pagination (HTML fragment)

use crate::routes::params::{today, ReportParams};
use crate::{ApiError, AppState};
use axum::extract::Query;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use salesboard_config::Period;
use salesboard_core::error::ErrorContext;
use salesboard_core::{Filter, PageResult, StoreTotals};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct SalesResponse {
    pub period: String,
    pub filter: Filter,
    #[serde(flatten)]
    pub result: PageResult,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub totals: StoreTotals,
    pub total_sales_display: String,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct PeriodOption {
    pub value: Period,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PeriodsResponse {
    pub default: Period,
    pub periods: Vec<PeriodOption>,
    pub statuses: Vec<String>,
}

/// Get the filtered sales listing (JSON API)
pub async fn api_sales(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Json<SalesResponse>, ApiError> {
    let report = ReportParams::from_query(&params, &state.config);
    let filter = report.filter(today());

    let result = state
        .service
        .list_transactions(&filter, report.page)
        .await
        .map_err(|e| {
            let context = ErrorContext::new("api_sales")
                .with_request_id("/api/sales".to_string())
                .with_data("filter", serde_json::json!(filter.description()))
                .with_data("page", serde_json::json!(report.page));
            ApiError::from_core(e, &context)
        })?;

    Ok(Json(SalesResponse {
        period: report.period,
        filter,
        result,
    }))
}

/// Get dashboard totals (JSON API)
pub async fn api_summary(
    state: axum::extract::State<AppState>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let totals = state
        .service
        .totals()
        .await
        .map_err(|e| ApiError::from_core(e, &ErrorContext::new("api_summary")))?;

    Ok(Json(SummaryResponse {
        total_sales_display: state.format_money(totals.total_sales),
        currency: state.config.currency.code.clone(),
        totals,
    }))
}

/// Get period and status options for the filter form (JSON API)
pub async fn api_periods(state: axum::extract::State<AppState>) -> Json<PeriodsResponse> {
    Json(PeriodsResponse {
        default: state.config.report.default_period,
        periods: Period::ALL
            .iter()
            .map(|p| PeriodOption {
                value: *p,
                label: p.label(),
            })
            .collect(),
        statuses: state.config.report.statuses.clone(),
    })
}

/// HTMX: Sales list - Partial page update
pub async fn htmx_sales_list(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Response {
    let report = ReportParams::from_query(&params, &state.config);
    let filter = report.filter(today());

    match state.service.list_transactions(&filter, report.page).await {
        Ok(result) => {
            Html(super::page::render_sales_content(&result, &params, &state)).into_response()
        }
        Err(e) => {
            let context = ErrorContext::new("htmx_sales_list")
                .with_request_id("/sales/list".to_string())
                .with_data("filter", serde_json::json!(filter.description()));
            let error = ApiError::from_core(e, &context);
            (
                error.status_code(),
                Html(super::page::render_error(&error.to_string())),
            )
                .into_response()
        }
    }
}
