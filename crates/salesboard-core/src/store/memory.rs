//! In-memory billing tables

use super::{year_bounds, SalesStore};
use crate::error::CoreResult;
use crate::filter::TransactionQuery;
use crate::models::{
    ClientRecord, InvoiceRecord, Metric, MonthlyAggregate, PageRequest, ServiceRecord,
    StoreTotals, TransactionRecord,
};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Fixture store holding clients, invoices and hosted services in vectors
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    clients: Vec<ClientRecord>,
    invoices: Vec<InvoiceRecord>,
    services: Vec<ServiceRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(mut self, client: ClientRecord) -> Self {
        self.clients.push(client);
        self
    }

    pub fn with_invoice(mut self, invoice: InvoiceRecord) -> Self {
        self.invoices.push(invoice);
        self
    }

    pub fn with_service(mut self, service: ServiceRecord) -> Self {
        self.services.push(service);
        self
    }

    /// Inner join of invoices to clients, sorted by invoice id
    fn joined(&self) -> Vec<TransactionRecord> {
        let clients: HashMap<i64, &ClientRecord> =
            self.clients.iter().map(|c| (c.id, c)).collect();

        let mut rows: Vec<TransactionRecord> = self
            .invoices
            .iter()
            .filter_map(|invoice| {
                clients.get(&invoice.client_id).map(|client| TransactionRecord {
                    invoice_id: invoice.id,
                    client_id: client.id,
                    client_first_name: client.first_name.clone(),
                    client_last_name: client.last_name.clone(),
                    total: invoice.total,
                    date: invoice.date,
                    payment_method: invoice.payment_method.clone(),
                    status: invoice.status.clone(),
                })
            })
            .collect();
        rows.sort_by_key(|r| r.invoice_id);
        rows
    }
}

fn bucket(
    year: i32,
    metric: Metric,
    rows: impl Iterator<Item = (NaiveDate, Decimal)>,
) -> CoreResult<MonthlyAggregate> {
    let (start, end) = year_bounds(year)?;
    let mut aggregate = MonthlyAggregate::new(year, metric);
    for (date, value) in rows.filter(|(d, _)| *d >= start && *d <= end) {
        *aggregate.values.entry(date.month()).or_insert(Decimal::ZERO) += value;
    }
    Ok(aggregate)
}

#[async_trait]
impl SalesStore for MemoryStore {
    async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
        page: PageRequest,
    ) -> CoreResult<Vec<TransactionRecord>> {
        Ok(self
            .joined()
            .into_iter()
            .filter(|r| query.matches(r))
            .skip(page.offset() as usize)
            .take(page.page_size)
            .collect())
    }

    async fn count_transactions(&self, query: &TransactionQuery) -> CoreResult<u64> {
        Ok(self.joined().iter().filter(|r| query.matches(r)).count() as u64)
    }

    async fn monthly_aggregate(&self, year: i32, metric: Metric) -> CoreResult<MonthlyAggregate> {
        match metric {
            Metric::SalesTotal => bucket(year, metric, self.invoices.iter().map(|i| (i.date, i.total))),
            Metric::InvoiceCount => bucket(year, metric, self.invoices.iter().map(|i| (i.date, Decimal::ONE))),
            Metric::ClientSignups => bucket(
                year,
                metric,
                self.clients.iter().map(|c| (c.date_created, Decimal::ONE)),
            ),
            Metric::ServiceActivations => bucket(
                year,
                metric,
                self.services.iter().map(|s| (s.registration_date, Decimal::ONE)),
            ),
        }
    }

    async fn totals(&self) -> CoreResult<StoreTotals> {
        Ok(StoreTotals {
            total_clients: self.clients.len() as u64,
            total_invoices: self.invoices.len() as u64,
            total_sales: self.invoices.iter().map(|i| i.total).sum(),
            total_services: self.services.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client(id: i64, created: NaiveDate) -> ClientRecord {
        ClientRecord {
            id,
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            date_created: created,
        }
    }

    fn invoice(id: i64, client_id: i64, date: NaiveDate, total: i64) -> InvoiceRecord {
        InvoiceRecord {
            id,
            client_id,
            total: Decimal::from(total),
            date,
            payment_method: "paypal".to_string(),
            status: "Paid".to_string(),
        }
    }

    #[tokio::test]
    async fn test_join_drops_orphans_and_sorts_by_id() {
        let store = MemoryStore::new()
            .with_client(client(1, date(2023, 5, 1)))
            .with_invoice(invoice(30, 1, date(2024, 1, 3), 10))
            .with_invoice(invoice(10, 1, date(2024, 1, 1), 10))
            .with_invoice(invoice(20, 99, date(2024, 1, 2), 10));

        let rows = store
            .fetch_transactions(&TransactionQuery::new(), PageRequest::default())
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.invoice_id).collect();
        assert_eq!(ids, vec![10, 30]);
        assert_eq!(store.count_transactions(&TransactionQuery::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_monthly_aggregate_is_sparse_and_year_scoped() {
        let store = MemoryStore::new()
            .with_client(client(1, date(2024, 3, 9)))
            .with_client(client(2, date(2023, 3, 9)))
            .with_invoice(invoice(1, 1, date(2024, 3, 1), 40))
            .with_invoice(invoice(2, 1, date(2024, 3, 20), 60))
            .with_invoice(invoice(3, 1, date(2024, 7, 4), 5))
            .with_invoice(invoice(4, 1, date(2025, 1, 1), 999));

        let sales = store.monthly_aggregate(2024, Metric::SalesTotal).await.unwrap();
        assert_eq!(sales.values.len(), 2);
        assert_eq!(sales.values[&3], Decimal::from(100));
        assert_eq!(sales.values[&7], Decimal::from(5));

        let counts = store.monthly_aggregate(2024, Metric::InvoiceCount).await.unwrap();
        assert_eq!(counts.values[&3], Decimal::from(2));

        let signups = store.monthly_aggregate(2024, Metric::ClientSignups).await.unwrap();
        assert_eq!(signups.values.len(), 1);
        assert_eq!(signups.values[&3], Decimal::ONE);

        let services = store
            .monthly_aggregate(2024, Metric::ServiceActivations)
            .await
            .unwrap();
        assert!(services.is_empty());
    }

    #[tokio::test]
    async fn test_status_filter_applies_to_count() {
        let mut unpaid = invoice(2, 1, date(2024, 2, 1), 10);
        unpaid.status = "Unpaid".to_string();
        let store = MemoryStore::new()
            .with_client(client(1, date(2023, 1, 1)))
            .with_invoice(invoice(1, 1, date(2024, 2, 1), 10))
            .with_invoice(unpaid);

        let query = Filter::unbounded().with_status("Unpaid").to_query();
        assert_eq!(store.count_transactions(&query).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_totals() {
        let store = MemoryStore::new()
            .with_client(client(1, date(2023, 1, 1)))
            .with_invoice(invoice(1, 1, date(2024, 2, 1), 10))
            .with_invoice(invoice(2, 1, date(2024, 2, 2), 15))
            .with_service(ServiceRecord {
                id: 1,
                registration_date: date(2024, 2, 1),
            });

        let totals = store.totals().await.unwrap();
        assert_eq!(totals.total_clients, 1);
        assert_eq!(totals.total_invoices, 2);
        assert_eq!(totals.total_sales, Decimal::from(25));
        assert_eq!(totals.total_services, 1);
    }
}
