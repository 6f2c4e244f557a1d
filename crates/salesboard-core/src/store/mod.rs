//! Read-only access to the billing data source
//!
//! - memory: fixture store used by tests and demos
//! - sqlite: SQL store over the billing tables

pub mod memory;
pub mod sqlite;

use crate::error::{CoreError, CoreResult};
use crate::filter::TransactionQuery;
use crate::models::{Metric, MonthlyAggregate, PageRequest, StoreTotals, TransactionRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Store reference type
pub type StoreRef = Arc<dyn SalesStore>;

/// Queries the sales report needs from the billing data source
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// One page of invoices joined to clients, ordered by invoice id ascending
    async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
        page: PageRequest,
    ) -> CoreResult<Vec<TransactionRecord>>;

    /// Number of joined rows matching `query`
    async fn count_transactions(&self, query: &TransactionQuery) -> CoreResult<u64>;

    /// Sparse per-month values for `metric` within calendar `year`
    async fn monthly_aggregate(&self, year: i32, metric: Metric) -> CoreResult<MonthlyAggregate>;

    /// Overall counts across all records
    async fn totals(&self) -> CoreResult<StoreTotals>;
}

/// First and last day of a calendar year
pub fn year_bounds(year: i32) -> CoreResult<(NaiveDate, NaiveDate)> {
    match (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(CoreError::invalid_argument(format!("year {} out of range", year))),
    }
}
