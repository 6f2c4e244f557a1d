//! Record projections, metrics and pagination types

use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rows per page of the sales listing
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// An invoice joined to its owning client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub invoice_id: i64,
    pub client_id: i64,
    pub client_first_name: String,
    pub client_last_name: String,
    pub total: Decimal,
    pub date: NaiveDate,
    pub payment_method: String,
    pub status: String,
}

impl TransactionRecord {
    /// "First Last", as shown in the listing
    pub fn client_name(&self) -> String {
        format!("{} {}", self.client_first_name, self.client_last_name)
            .trim()
            .to_string()
    }
}

/// Raw invoice row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: i64,
    pub client_id: i64,
    pub total: Decimal,
    pub date: NaiveDate,
    pub payment_method: String,
    pub status: String,
}

/// Raw client row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_created: NaiveDate,
}

/// Raw hosted-service row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: i64,
    pub registration_date: NaiveDate,
}

/// Month-bucketed metric kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Sum of invoice totals
    SalesTotal,
    /// Number of invoices
    InvoiceCount,
    /// Number of new clients
    ClientSignups,
    /// Number of hosted services registered
    ServiceActivations,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::SalesTotal,
        Metric::InvoiceCount,
        Metric::ClientSignups,
        Metric::ServiceActivations,
    ];

    /// Chart title
    pub fn label(&self) -> &'static str {
        match self {
            Metric::SalesTotal => "Total Sales",
            Metric::InvoiceCount => "Total Invoices",
            Metric::ClientSignups => "Total Clients",
            Metric::ServiceActivations => "Total Services",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "salestotal" | "sales" => Ok(Metric::SalesTotal),
            "invoicecount" | "invoices" => Ok(Metric::InvoiceCount),
            "clientsignups" | "clients" => Ok(Metric::ClientSignups),
            "serviceactivations" | "services" => Ok(Metric::ServiceActivations),
            _ => Err(CoreError::invalid_argument(format!("unsupported metric: {}", s))),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::SalesTotal => write!(f, "sales_total"),
            Metric::InvoiceCount => write!(f, "invoice_count"),
            Metric::ClientSignups => write!(f, "client_signups"),
            Metric::ServiceActivations => write!(f, "service_activations"),
        }
    }
}

/// Sparse month (1-12) to value mapping for one year and one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub year: i32,
    pub metric: Metric,
    pub values: BTreeMap<u32, Decimal>,
}

impl MonthlyAggregate {
    pub fn new(year: i32, metric: Metric) -> Self {
        Self {
            year,
            metric,
            values: BTreeMap::new(),
        }
    }

    pub fn with_values(year: i32, metric: Metric, values: impl IntoIterator<Item = (u32, Decimal)>) -> Self {
        Self {
            year,
            metric,
            values: values.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A 1-based page of the sales listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: usize,
}

impl PageRequest {
    /// Pages below 1 are clamped to 1 so the offset can never go negative.
    pub fn new(page: i64, page_size: usize) -> Self {
        let clamped = if page < 1 {
            log::debug!("Clamping page {} to 1", page);
            1
        } else {
            page as u64
        };
        Self {
            page: clamped,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size as u64)
    }

    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of the listing plus totals computed by a separate count query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub rows: Vec<TransactionRecord>,
    pub total_records: u64,
    pub total_pages: u64,
    pub page: u64,
    pub page_size: usize,
}

impl PageResult {
    pub fn new(rows: Vec<TransactionRecord>, total_records: u64, request: PageRequest) -> Self {
        Self {
            rows,
            total_records,
            total_pages: total_records.div_ceil(request.page_size as u64),
            page: request.page,
            page_size: request.page_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Overall counts for the dashboard widgets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreTotals {
    pub total_clients: u64,
    pub total_invoices: u64,
    pub total_sales: Decimal,
    pub total_services: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_to_first_page() {
        for page in [0, -1, -250] {
            let request = PageRequest::new(page, DEFAULT_PAGE_SIZE);
            assert_eq!(request.page, 1);
            assert_eq!(request.offset(), 0);
        }
    }

    #[test]
    fn test_total_pages() {
        let request = PageRequest::new(1, 100);
        assert_eq!(PageResult::new(vec![], 0, request).total_pages, 0);
        assert_eq!(PageResult::new(vec![], 1, request).total_pages, 1);
        assert_eq!(PageResult::new(vec![], 100, request).total_pages, 1);
        assert_eq!(PageResult::new(vec![], 250, request).total_pages, 3);
    }

    #[test]
    fn test_page_navigation_flags() {
        let result = PageResult::new(vec![], 250, PageRequest::new(2, 100));
        assert!(result.has_previous());
        assert!(result.has_next());

        let result = PageResult::new(vec![], 250, PageRequest::new(3, 100));
        assert!(!result.has_next());
    }

    #[test]
    fn test_metric_tokens() {
        assert_eq!("sales_total".parse::<Metric>().unwrap(), Metric::SalesTotal);
        assert_eq!("salesTotal".parse::<Metric>().unwrap(), Metric::SalesTotal);
        assert_eq!("invoices".parse::<Metric>().unwrap(), Metric::InvoiceCount);
        assert_eq!("client-signups".parse::<Metric>().unwrap(), Metric::ClientSignups);
        assert_eq!(
            "serviceActivations".parse::<Metric>().unwrap(),
            Metric::ServiceActivations
        );

        let err = "revenue".parse::<Metric>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn test_metric_display_round_trips() {
        for metric in Metric::ALL {
            assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_client_name() {
        let record = TransactionRecord {
            invoice_id: 1,
            client_id: 7,
            client_first_name: "Ada".to_string(),
            client_last_name: "Lovelace".to_string(),
            total: Decimal::from(10),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            payment_method: "paypal".to_string(),
            status: "Paid".to_string(),
        };
        assert_eq!(record.client_name(), "Ada Lovelace");
    }
}
