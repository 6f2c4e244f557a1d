//! Sales routes - Dashboard, filtered listing, pagination
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{api_periods, api_sales, api_summary, htmx_sales_list};

pub use page::page_dashboard;
