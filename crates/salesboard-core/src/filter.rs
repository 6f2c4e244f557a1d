//! Date-range resolution and the typed predicate builder for the sales listing

use crate::models::TransactionRecord;
use chrono::{Days, Months, NaiveDate};
use salesboard_config::Period;
use serde::{Deserialize, Serialize};

/// Listing filter. Absent fields leave that dimension unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Inclusive lower bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound
    pub end_date: Option<NaiveDate>,
    /// Exact status match
    pub status: Option<String>,
}

impl Filter {
    /// No bounds and no status
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Inclusive date range
    pub fn between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start_date: start,
            end_date: end,
            status: None,
        }
    }

    /// Attach a status; blank strings mean "any status"
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        self.status = if status.trim().is_empty() {
            None
        } else {
            Some(status)
        };
        self
    }

    /// Check if a date is within the filter's range
    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Start after end: matches nothing, but is not an error
    pub fn is_inverted(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(s), Some(e)) if s > e)
    }

    /// Human-readable description of the date range
    pub fn description(&self) -> String {
        match (self.start_date, self.end_date) {
            (Some(s), Some(e)) => format!("{} to {}", s, e),
            (Some(s), None) => format!("From {}", s),
            (None, Some(e)) => format!("Until {}", e),
            (None, None) => "All Time".to_string(),
        }
    }

    /// Predicates for this filter, in bound-then-status order
    pub fn to_query(&self) -> TransactionQuery {
        let mut query = TransactionQuery::new();
        if let Some(start) = self.start_date {
            query = query.and(Predicate::DateOnOrAfter(start));
        }
        if let Some(end) = self.end_date {
            query = query.and(Predicate::DateOnOrBefore(end));
        }
        // fields are public, so a blank status can bypass `with_status`
        if let Some(status) = self.status.as_ref().filter(|s| !s.trim().is_empty()) {
            query = query.and(Predicate::StatusEquals(status.clone()));
        }
        query
    }
}

/// Resolve a raw period token.
///
/// Tokens match case-insensitively (`Week` is `week`). Unknown tokens yield
/// an unbounded filter rather than an error.
pub fn resolve(
    period: &str,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    today: NaiveDate,
) -> Filter {
    match period.parse::<Period>() {
        Ok(period) => resolve_period(period, custom_start, custom_end, today),
        Err(_) => {
            log::warn!("Unrecognized period '{}', applying no date filter", period);
            Filter::unbounded()
        }
    }
}

/// Resolve a known period relative to `today`
pub fn resolve_period(
    period: Period,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    today: NaiveDate,
) -> Filter {
    let start = match period {
        Period::Week => today.checked_sub_days(Days::new(7)),
        // chrono clamps to the last day of a shorter month
        Period::Month => today.checked_sub_months(Months::new(1)),
        Period::Year => today.checked_sub_months(Months::new(12)),
        Period::Custom => return Filter::between(custom_start, custom_end),
    };
    Filter::between(start, Some(today))
}

/// One clause of the listing's WHERE condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    DateOnOrAfter(NaiveDate),
    DateOnOrBefore(NaiveDate),
    StatusEquals(String),
}

impl Predicate {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            Predicate::DateOnOrAfter(start) => record.date >= *start,
            Predicate::DateOnOrBefore(end) => record.date <= *end,
            Predicate::StatusEquals(status) => record.status == *status,
        }
    }
}

/// Ordered set of predicates, ANDed together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    predicates: Vec<Predicate>,
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: NaiveDate, status: &str) -> TransactionRecord {
        TransactionRecord {
            invoice_id: 1,
            client_id: 1,
            client_first_name: "Grace".to_string(),
            client_last_name: "Hopper".to_string(),
            total: Decimal::from(25),
            date,
            payment_method: "banktransfer".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_resolve_week() {
        let today = date(2024, 3, 15);
        let filter = resolve("week", None, None, today);
        assert_eq!(filter.start_date, Some(date(2024, 3, 8)));
        assert_eq!(filter.end_date, Some(today));
        assert_eq!(filter.status, None);
    }

    #[test]
    fn test_resolve_month() {
        let today = date(2024, 3, 15);
        let filter = resolve("month", None, None, today);
        assert_eq!(filter.start_date, Some(date(2024, 2, 15)));
        assert_eq!(filter.end_date, Some(today));
    }

    #[test]
    fn test_resolve_year() {
        let today = date(2024, 3, 15);
        let filter = resolve("year", None, None, today);
        assert_eq!(filter.start_date, Some(date(2023, 3, 15)));
        assert_eq!(filter.end_date, Some(today));
    }

    #[test]
    fn test_resolve_month_clamps_to_shorter_month() {
        let filter = resolve("month", None, None, date(2024, 3, 31));
        assert_eq!(filter.start_date, Some(date(2024, 2, 29)));

        let filter = resolve("year", None, None, date(2024, 2, 29));
        assert_eq!(filter.start_date, Some(date(2023, 2, 28)));
    }

    #[test]
    fn test_resolve_custom() {
        let filter = resolve(
            "custom",
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 31)),
            date(2024, 3, 15),
        );
        assert_eq!(filter, Filter::between(Some(date(2024, 1, 1)), Some(date(2024, 1, 31))));
    }

    #[test]
    fn test_resolve_custom_allows_missing_and_inverted_bounds() {
        let today = date(2024, 3, 15);
        let filter = resolve("custom", None, Some(date(2024, 1, 31)), today);
        assert_eq!(filter.start_date, None);
        assert_eq!(filter.end_date, Some(date(2024, 1, 31)));

        let filter = resolve("custom", Some(date(2024, 2, 1)), Some(date(2024, 1, 1)), today);
        assert!(filter.is_inverted());
    }

    #[test]
    fn test_resolve_unknown_period_is_unbounded() {
        let today = date(2024, 3, 15);
        for token in ["quarter", "", "WEEKLY", "all"] {
            let filter = resolve(token, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), today);
            assert_eq!(filter, Filter::unbounded(), "token {:?}", token);
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let today = date(2024, 3, 15);
        assert_eq!(resolve("Week", None, None, today), resolve("week", None, None, today));
        let filter = resolve("MONTH", None, None, today);
        assert_eq!(filter.start_date, Some(date(2024, 2, 15)));
        assert_eq!(filter.end_date, Some(today));
    }

    #[test]
    fn test_with_status_blank_is_absent() {
        assert_eq!(Filter::unbounded().with_status("").status, None);
        assert_eq!(Filter::unbounded().with_status("  ").status, None);
        assert_eq!(
            Filter::unbounded().with_status("Paid").status.as_deref(),
            Some("Paid")
        );
    }

    #[test]
    fn test_contains_is_inclusive() {
        let day = date(2024, 2, 1);
        let filter = Filter::between(Some(day), Some(day));
        assert!(filter.contains(&day));
        assert!(!filter.contains(&date(2024, 1, 31)));
        assert!(!filter.contains(&date(2024, 2, 2)));
    }

    #[test]
    fn test_query_predicates_follow_filter() {
        let query = Filter::between(Some(date(2024, 1, 1)), None)
            .with_status("Unpaid")
            .to_query();
        assert_eq!(
            query.predicates(),
            &[
                Predicate::DateOnOrAfter(date(2024, 1, 1)),
                Predicate::StatusEquals("Unpaid".to_string()),
            ]
        );
        assert!(Filter::unbounded().to_query().predicates().is_empty());
    }

    #[test]
    fn test_query_skips_blank_status() {
        for status in ["", "   "] {
            let filter = Filter {
                status: Some(status.to_string()),
                ..Filter::unbounded()
            };
            assert!(filter.to_query().predicates().is_empty(), "status {:?}", status);
        }
    }

    #[test]
    fn test_query_is_conjunctive() {
        let paid = record(date(2024, 2, 1), "Paid");
        let query = Filter::between(Some(date(2024, 1, 1)), Some(date(2024, 2, 29)))
            .with_status("Paid")
            .to_query();
        assert!(query.matches(&paid));

        let wrong_status = Filter::between(Some(date(2024, 1, 1)), Some(date(2024, 2, 29)))
            .with_status("Unpaid")
            .to_query();
        assert!(!wrong_status.matches(&paid));

        let wrong_range = Filter::between(Some(date(2024, 3, 1)), None)
            .with_status("Paid")
            .to_query();
        assert!(!wrong_range.matches(&paid));
    }

    #[test]
    fn test_description() {
        assert_eq!(Filter::unbounded().description(), "All Time");
        assert_eq!(
            Filter::between(Some(date(2024, 1, 1)), Some(date(2024, 1, 31))).description(),
            "2024-01-01 to 2024-01-31"
        );
    }
}
