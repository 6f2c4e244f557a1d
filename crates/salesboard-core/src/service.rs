//! Sales query service: paginated listing and monthly series

use crate::chart::{chart_data, to_series, ChartData, MonthlySeries};
use crate::error::CoreResult;
use crate::filter::Filter;
use crate::models::{Metric, MonthlyAggregate, PageRequest, PageResult, StoreTotals, DEFAULT_PAGE_SIZE};
use crate::store::StoreRef;

/// Entry point for the report queries. Holds no per-request state.
#[derive(Clone)]
pub struct SalesQueryService {
    store: StoreRef,
    page_size: usize,
}

impl SalesQueryService {
    pub fn new(store: StoreRef) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// One page of matching transactions plus the total match count.
    ///
    /// The page and the count are separate queries over the same predicates,
    /// awaited together. `SqliteStore` runs them off the async runtime but
    /// one at a time on its single connection. Pages below 1 are clamped to 1.
    pub async fn list_transactions(&self, filter: &Filter, page: i64) -> CoreResult<PageResult> {
        let request = PageRequest::new(page, self.page_size);
        let query = filter.to_query();
        if filter.is_inverted() {
            log::debug!("Inverted date range {}, expecting no rows", filter.description());
        }

        let (rows, total_records) = tokio::try_join!(
            self.store.fetch_transactions(&query, request),
            self.store.count_transactions(&query),
        )?;

        log::debug!(
            "Listing page {} ({}): {} rows of {}",
            request.page,
            filter.description(),
            rows.len(),
            total_records
        );
        Ok(PageResult::new(rows, total_records, request))
    }

    /// Sparse per-month values for one metric and year
    pub async fn monthly_aggregate(&self, year: i32, metric: Metric) -> CoreResult<MonthlyAggregate> {
        self.store.monthly_aggregate(year, metric).await
    }

    /// Gap-filled January..December values for one metric and year
    pub async fn monthly_series(&self, year: i32, metric: Metric) -> CoreResult<MonthlySeries> {
        let aggregate = self.monthly_aggregate(year, metric).await?;
        to_series(&aggregate)
    }

    /// Line chart payload for one metric and year
    pub async fn monthly_chart(&self, year: i32, metric: Metric) -> CoreResult<ChartData> {
        let aggregate = self.monthly_aggregate(year, metric).await?;
        chart_data(&aggregate)
    }

    /// All four charts, awaited together. Each keeps its own result so a
    /// failing metric does not hide the others.
    pub async fn all_monthly_charts(&self, year: i32) -> Vec<(Metric, CoreResult<ChartData>)> {
        let (sales, invoices, clients, services) = tokio::join!(
            self.monthly_chart(year, Metric::SalesTotal),
            self.monthly_chart(year, Metric::InvoiceCount),
            self.monthly_chart(year, Metric::ClientSignups),
            self.monthly_chart(year, Metric::ServiceActivations),
        );
        vec![
            (Metric::SalesTotal, sales),
            (Metric::InvoiceCount, invoices),
            (Metric::ClientSignups, clients),
            (Metric::ServiceActivations, services),
        ]
    }

    /// Dashboard widget totals
    pub async fn totals(&self) -> CoreResult<StoreTotals> {
        self.store.totals().await
    }
}
