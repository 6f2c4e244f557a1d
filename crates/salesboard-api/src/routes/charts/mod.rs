//! Chart routes - Monthly series for sales, invoices, clients and services
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Chart.js rendering for the dashboard

pub mod api;
pub mod page;

pub use api::{api_chart_metric, api_charts};

pub use page::render_charts;
