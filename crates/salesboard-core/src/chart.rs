//! Gap-filled monthly series and chart payloads

use crate::error::{CoreError, CoreResult};
use crate::models::{Metric, MonthlyAggregate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Twelve values, index 0 = January
pub type MonthlySeries = [Decimal; 12];

pub const MONTH_LABELS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Expand a sparse aggregate into a dense January..December series.
///
/// Months missing from the aggregate are zero. Keys outside 1-12 are rejected.
pub fn to_series(aggregate: &MonthlyAggregate) -> CoreResult<MonthlySeries> {
    let mut series = [Decimal::ZERO; 12];
    for (&month, &value) in &aggregate.values {
        if !(1..=12).contains(&month) {
            return Err(CoreError::invalid_argument(format!(
                "month {} out of range for {} {}",
                month, aggregate.metric, aggregate.year
            )));
        }
        series[(month - 1) as usize] = value;
    }
    Ok(series)
}

/// Chart dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Option<String>,
}

/// Line chart for one metric over one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub chart_type: String,
    pub title: String,
    pub metric: Metric,
    pub year: i32,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

fn border_color(metric: Metric) -> &'static str {
    match metric {
        Metric::ClientSignups => "rgba(54, 162, 235, 1)",
        Metric::InvoiceCount => "rgba(75, 192, 192, 1)",
        Metric::SalesTotal => "rgba(255, 206, 86, 1)",
        Metric::ServiceActivations => "rgba(255, 99, 132, 1)",
    }
}

/// Build the line chart payload for an aggregate
pub fn chart_data(aggregate: &MonthlyAggregate) -> CoreResult<ChartData> {
    let series = to_series(aggregate)?;
    Ok(ChartData {
        chart_type: "line".to_string(),
        title: aggregate.metric.label().to_string(),
        metric: aggregate.metric,
        year: aggregate.year,
        labels: MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
        datasets: vec![ChartDataset {
            label: aggregate.metric.label().to_string(),
            data: series.iter().map(|v| v.to_f64().unwrap_or(0.0)).collect(),
            border_color: Some(border_color(aggregate.metric).to_string()),
        }],
    })
}
