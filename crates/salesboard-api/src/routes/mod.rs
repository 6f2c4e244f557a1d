//! Route modules for the API server
//!
//! - sales: Dashboard page, listing fragment, listing/summary/period JSON
//! - charts: Monthly chart JSON and chart rendering
//! - params: Query string parsing
//!
//! Each feature module follows the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: HTML rendering

pub mod charts;
pub mod params;
pub mod sales;
