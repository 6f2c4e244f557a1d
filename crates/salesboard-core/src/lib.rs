//! Sales report queries and monthly aggregation

pub mod chart;
pub mod error;
pub mod filter;
pub mod models;
pub mod service;
pub mod store;

pub use chart::{chart_data, to_series, ChartData, ChartDataset, MonthlySeries, MONTH_LABELS};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use filter::{resolve, resolve_period, Filter, Predicate, TransactionQuery};
pub use models::{
    ClientRecord, InvoiceRecord, Metric, MonthlyAggregate, PageRequest, PageResult, ServiceRecord,
    StoreTotals, TransactionRecord, DEFAULT_PAGE_SIZE,
};
pub use service::SalesQueryService;
pub use store::{MemoryStore, SalesStore, SqliteStore, StoreRef};
