//! Request parameter parsing shared by the page, HTMX and JSON handlers
//!
//! Malformed values never fail a request: bad dates are treated as absent and
//! a non-numeric page falls back to the first page.

use chrono::{Datelike, NaiveDate};
use salesboard_config::Config;
use salesboard_core::filter::{resolve, Filter};
use std::collections::HashMap;

/// Listing parameters taken from the query string
#[derive(Debug, Clone, PartialEq)]
pub struct ReportParams {
    pub period: String,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: i64,
}

impl ReportParams {
    pub fn from_query(params: &HashMap<String, String>, config: &Config) -> Self {
        let period = params
            .get("period")
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .unwrap_or_else(|| config.report.default_period.to_string());

        Self {
            period,
            status: params
                .get("status")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            start_date: params.get("start_date").and_then(|s| parse_date(s)),
            end_date: params.get("end_date").and_then(|s| parse_date(s)),
            page: parse_page(params.get("page").map(|s| s.as_str())),
        }
    }

    /// Resolve the period against `today` and attach the status
    pub fn filter(&self, today: NaiveDate) -> Filter {
        let filter = resolve(&self.period, self.start_date, self.end_date, today);
        match &self.status {
            Some(status) => filter.with_status(status.clone()),
            None => filter,
        }
    }

    pub fn status_or_empty(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// ISO `YYYY-MM-DD`; anything else is absent
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn parse_page(value: Option<&str>) -> i64 {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(1)
}

/// Chart year, defaulting to the year of `today`
pub fn parse_year(params: &HashMap<String, String>, today: NaiveDate) -> i32 {
    params
        .get("year")
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| today.year())
}

/// Server-local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let params = ReportParams::from_query(&HashMap::new(), &Config::default());
        assert_eq!(params.period, "month");
        assert_eq!(params.status, None);
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let params = ReportParams::from_query(
            &query(&[
                ("period", "custom"),
                ("start_date", "2024-13-40"),
                ("end_date", "yesterday"),
                ("page", "abc"),
                ("status", "   "),
            ]),
            &Config::default(),
        );
        assert_eq!(params.start_date, None);
        assert_eq!(params.end_date, None);
        assert_eq!(params.page, 1);
        assert_eq!(params.status, None);
        assert_eq!(params.filter(date(2024, 3, 15)), Filter::unbounded());
    }

    #[test]
    fn test_custom_filter_with_status() {
        let params = ReportParams::from_query(
            &query(&[
                ("period", "custom"),
                ("start_date", "2024-01-01"),
                ("end_date", "2024-01-31"),
                ("status", "Paid"),
                ("page", "3"),
            ]),
            &Config::default(),
        );
        let filter = params.filter(date(2024, 3, 15));
        assert_eq!(filter.start_date, Some(date(2024, 1, 1)));
        assert_eq!(filter.end_date, Some(date(2024, 1, 31)));
        assert_eq!(filter.status.as_deref(), Some("Paid"));
        assert_eq!(params.page, 3);
    }

    #[test]
    fn test_week_ignores_custom_dates() {
        let params = ReportParams::from_query(
            &query(&[("period", "week"), ("start_date", "2020-01-01")]),
            &Config::default(),
        );
        let filter = params.filter(date(2024, 3, 15));
        assert_eq!(filter.start_date, Some(date(2024, 3, 8)));
        assert_eq!(filter.end_date, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_year() {
        let today = date(2024, 3, 15);
        assert_eq!(parse_year(&HashMap::new(), today), 2024);
        assert_eq!(parse_year(&query(&[("year", "2021")]), today), 2021);
        assert_eq!(parse_year(&query(&[("year", "soon")]), today), 2024);
    }
}
