//! HTTP dashboard and JSON API with HTMX support
//!
//! Routes are organized into modules:
//! - routes::sales: Dashboard page, sales listing, totals
//! - routes::charts: Monthly chart series
//! - routes::params: Query string parsing

pub mod error;
pub mod routes;

use axum::{http::Method, routing::get, Router};
use salesboard_config::Config;
use salesboard_core::SalesQueryService;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SalesQueryService>,
    pub config: Config,
}

impl AppState {
    pub fn new(service: SalesQueryService, config: Config) -> Self {
        Self {
            service: Arc::new(service),
            config,
        }
    }

    /// Amount with the configured separators followed by the currency code
    pub fn format_money(&self, value: Decimal) -> String {
        let currency = &self.config.currency;
        format!(
            "{} {}",
            salesboard_utils::format_amount(
                value,
                currency.decimal_places,
                &currency.thousands_separator,
                &currency.decimal_separator,
            ),
            currency.code
        )
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::charts::{api_chart_metric, api_charts};
    use routes::sales::{api_periods, api_sales, api_summary, htmx_sales_list, page_dashboard};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/summary", get(api_summary))
        .route("/api/sales", get(api_sales))
        .route("/api/periods", get(api_periods))
        .route("/api/charts", get(api_charts))
        .route("/api/charts/:metric", get(api_chart_metric))
        // HTMX page routes
        .route("/", get(page_dashboard))
        .route("/dashboard", get(page_dashboard))
        // HTMX partial routes
        .route("/sales/list", get(htmx_sales_list))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound {
        resource: uri.path().to_string(),
    }
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Salesboard</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css">
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        salesboard_utils::escape_html(title),
        content
    )
}

/// Header bar above the main content area
pub fn header_bar(title: &str) -> String {
    format!(
        r#"<header class='bg-white border-b px-6 py-4 flex items-center justify-between'>
        <h1 class='text-xl font-bold text-indigo-600'>Salesboard</h1>
        <span class='text-sm text-gray-500'>{}</span>
    </header>"#,
        salesboard_utils::escape_html(title)
    )
}

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(r#"<main class='p-6'>{}</main>"#, inner_content)
    } else {
        base_html(
            title,
            &format!(
                r#"<div class='flex flex-col min-h-screen'>
    {}
    <main class='flex-1 p-6'>{}</main>
</div>"#,
                header_bar(title),
                inner_content
            ),
        )
    }
}

/// Start the HTTP server
///
/// Binds to the configured host and port and serves until the process stops.
pub async fn start_server(config: Config, service: SalesQueryService) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(service, config);

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Salesboard server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /sales/list (HTMX listing fragment)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
