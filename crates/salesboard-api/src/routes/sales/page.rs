//! Sales page rendering - Dashboard page and listing fragments
//!
//! Endpoints:
//! - page_dashboard: Widgets, filter form, listing and charts
//!
//! Helper functions:
//! - render_widgets: Totals cards
//! - render_filter_form: Period, custom range and status inputs
//! - render_sales_content: Table plus pagination (also served by /sales/list)
//! - render_error: Explicit failure state in place of partial data

use crate::routes::charts::render_charts;
use crate::routes::params::{parse_year, today, ReportParams};
use crate::{ApiError, AppState};
use axum::extract::Query;
use axum::response::{Html, IntoResponse, Response};
use salesboard_config::{Config, Period};
use salesboard_core::error::ErrorContext;
use salesboard_core::{PageResult, StoreTotals};
use salesboard_utils::{build_page_link, escape_html, format_number, ucfirst};
use std::collections::HashMap;

/// Dashboard page - Totals, filtered listing and monthly charts
pub async fn page_dashboard(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    params: Query<HashMap<String, String>>,
) -> Response {
    let today = today();
    let report = ReportParams::from_query(&params, &state.config);
    let filter = report.filter(today);
    let year = parse_year(&params, today);

    let (totals, listing, charts) = tokio::join!(
        state.service.totals(),
        state.service.list_transactions(&filter, report.page),
        state.service.all_monthly_charts(year),
    );

    let (totals, listing) = match (totals, listing) {
        (Ok(totals), Ok(listing)) => (totals, listing),
        (Err(e), _) | (_, Err(e)) => {
            let context = ErrorContext::new("page_dashboard")
                .with_data("filter", serde_json::json!(filter.description()));
            let error = ApiError::from_core(e, &context);
            let inner = render_error(&error.to_string());
            return (
                error.status_code(),
                Html(crate::page_response(&headers, "Sales", &inner)),
            )
                .into_response();
        }
    };

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-6'>
            <h2 class='text-2xl font-bold'>Sales</h2>
            <span class='text-sm text-gray-500'>{}</span>
        </div>
        {}
        <div class='border-b mb-4 flex gap-4'>
            <button id='tab-btn-data' onclick='showTab("data")' class='px-4 py-2 border-b-2 border-indigo-600 text-indigo-600 font-medium'>Data</button>
            <button id='tab-btn-charts' onclick='showTab("charts")' class='px-4 py-2 border-b-2 border-transparent text-gray-600'>Charts</button>
        </div>
        <div id='tab-data'>
            {}
            <div id='sales-content' class='bg-white rounded-xl shadow-sm p-6'>{}</div>
        </div>
        <div id='tab-charts' style='display:none'>{}</div>
        <script>
        function showTab(name) {{
            ['data', 'charts'].forEach(function(tab) {{
                var active = tab === name;
                document.getElementById('tab-' + tab).style.display = active ? 'block' : 'none';
                var btn = document.getElementById('tab-btn-' + tab);
                btn.classList.toggle('border-indigo-600', active);
                btn.classList.toggle('text-indigo-600', active);
                btn.classList.toggle('border-transparent', !active);
            }});
        }}
        </script>"#,
        escape_html(&filter.description()),
        render_widgets(&totals, &state),
        render_filter_form(&report, &state.config),
        render_sales_content(&listing, &params, &state),
        render_charts(&charts, year),
    );

    Html(crate::page_response(&headers, "Sales", &inner_content)).into_response()
}

/// Totals cards
pub fn render_widgets(totals: &StoreTotals, state: &AppState) -> String {
    format!(
        r#"<div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>
            <div class='bg-blue-50 p-4 rounded-lg border border-blue-200'><p class='text-sm text-blue-600'>Total Clients</p><p class='text-2xl font-bold text-blue-700'>{}</p></div>
            <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Total Invoices</p><p class='text-2xl font-bold text-green-700'>{}</p></div>
            <div class='bg-yellow-50 p-4 rounded-lg border border-yellow-200'><p class='text-sm text-yellow-600'>Total Sales</p><p class='text-2xl font-bold text-yellow-700'>{}</p></div>
            <div class='bg-red-50 p-4 rounded-lg border border-red-200'><p class='text-sm text-red-600'>Total Services</p><p class='text-2xl font-bold text-red-700'>{}</p></div>
        </div>"#,
        format_number(totals.total_clients),
        format_number(totals.total_invoices),
        escape_html(&state.format_money(totals.total_sales)),
        format_number(totals.total_services),
    )
}

/// Filter form. Submits as a normal GET and refreshes the listing over HTMX.
pub fn render_filter_form(report: &ReportParams, config: &Config) -> String {
    let period_options: String = Period::ALL
        .iter()
        .map(|p| {
            let token = p.to_string();
            format!(
                "<option value='{}' {}>{}</option>",
                token,
                if report.period.eq_ignore_ascii_case(&token) { "selected" } else { "" },
                p.label()
            )
        })
        .collect();

    let mut status_options = format!(
        "<option value='' {}>All statuses</option>",
        if report.status.is_none() { "selected" } else { "" }
    );
    for status in &config.report.statuses {
        status_options.push_str(&format!(
            "<option value='{}' {}>{}</option>",
            escape_html(status),
            if report.status_or_empty() == status { "selected" } else { "" },
            escape_html(status)
        ));
    }

    let date_value = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

    format!(
        r#"<form action='/dashboard' method='get' hx-get='/sales/list' hx-target='#sales-content' hx-trigger='submit'
            class='bg-white rounded-xl shadow-sm p-4 mb-4 flex flex-wrap items-end gap-3'>
            <label class='text-sm text-gray-600'>Period
                <select name='period' class='block px-3 py-2 border rounded-lg'>{}</select>
            </label>
            <label class='text-sm text-gray-600'>Start date
                <input type='date' name='start_date' value='{}' class='block px-3 py-2 border rounded-lg'>
            </label>
            <label class='text-sm text-gray-600'>End date
                <input type='date' name='end_date' value='{}' class='block px-3 py-2 border rounded-lg'>
            </label>
            <label class='text-sm text-gray-600'>Status
                <select name='status' class='block px-3 py-2 border rounded-lg'>{}</select>
            </label>
            <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Filter</button>
            <span class='htmx-indicator text-sm text-gray-500'>Loading...</span>
        </form>"#,
        period_options,
        date_value(report.start_date),
        date_value(report.end_date),
        status_options,
    )
}

/// Listing table, record count and pagination
pub fn render_sales_content(
    result: &PageResult,
    params: &HashMap<String, String>,
    state: &AppState,
) -> String {
    let mut html = format!(
        "<p class='text-sm text-gray-500 mb-3'>{} records, page {} of {}</p>",
        format_number(result.total_records),
        result.page,
        result.total_pages.max(1)
    );
    html.push_str(&render_sales_table(result, state));
    html.push_str(&render_pagination(result, params));
    html
}

/// Invoice table with links to the billing admin pages
pub fn render_sales_table(result: &PageResult, state: &AppState) -> String {
    let mut rows = String::new();
    if result.is_empty() {
        rows.push_str("<tr><td colspan='6' class='text-center py-6 text-gray-500'>No items!</td></tr>");
    }
    for record in &result.rows {
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50'>
                <td class='px-3 py-2'><a href='invoices.php?action=edit&amp;id={}' class='text-indigo-600 hover:underline'>{}</a></td>
                <td class='px-3 py-2'><a href='clientssummary.php?userid={}' class='text-indigo-600 hover:underline'>{}</a></td>
                <td class='px-3 py-2'>{}</td>
                <td class='px-3 py-2 text-right'>{}</td>
                <td class='px-3 py-2'>{}</td>
                <td class='px-3 py-2'>{}</td>
            </tr>"#,
            record.invoice_id,
            record.invoice_id,
            record.client_id,
            escape_html(&record.client_name()),
            record.date.format("%Y-%m-%d"),
            escape_html(&state.format_money(record.total)),
            escape_html(&ucfirst(&record.payment_method)),
            escape_html(&ucfirst(&record.status)),
        ));
    }

    format!(
        r#"<table class='min-w-full text-sm'>
            <thead>
                <tr class='border-b text-left text-gray-600'>
                    <th class='px-3 py-2'>Invoice #</th>
                    <th class='px-3 py-2'>Client Name</th>
                    <th class='px-3 py-2'>Invoice Date</th>
                    <th class='px-3 py-2 text-right'>Total</th>
                    <th class='px-3 py-2'>Payment Method</th>
                    <th class='px-3 py-2'>Status</th>
                </tr>
            </thead>
            <tbody>{}</tbody>
        </table>"#,
        rows
    )
}

/// Previous, numbered and next links. Rendered only when there is more than one page.
pub fn render_pagination(result: &PageResult, params: &HashMap<String, String>) -> String {
    if result.total_pages <= 1 {
        return String::new();
    }

    let link = |page: u64, label: &str, active: bool| {
        format!(
            r#"<li><a href='{}' hx-get='{}' hx-target='#sales-content' class='px-3 py-1 border rounded {}'>{}</a></li>"#,
            escape_html(&build_page_link("/dashboard", params, page)),
            escape_html(&build_page_link("/sales/list", params, page)),
            if active { "bg-indigo-600 text-white" } else { "hover:bg-gray-100" },
            label
        )
    };

    let mut html = String::from("<nav class='mt-6'><ul class='flex flex-wrap items-center gap-1'>");
    if result.has_previous() {
        html.push_str(&link(result.page - 1, "&laquo; Previous", false));
    }
    for page in 1..=result.total_pages {
        html.push_str(&link(page, &page.to_string(), page == result.page));
    }
    if result.has_next() {
        html.push_str(&link(result.page + 1, "Next &raquo;", false));
    }
    html.push_str("</ul></nav>");
    html
}

/// Failure state shown instead of partial data
pub fn render_error(message: &str) -> String {
    format!(
        r#"<div class='bg-red-50 border border-red-200 text-red-700 rounded-lg p-4'>
            <p class='font-medium'>Unable to load sales data</p>
            <p class='text-sm'>{}</p>
        </div>"#,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use salesboard_core::{MemoryStore, PageRequest, SalesQueryService, TransactionRecord};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(
            SalesQueryService::new(Arc::new(MemoryStore::new())),
            Config::default(),
        )
    }

    fn record(id: i64) -> TransactionRecord {
        TransactionRecord {
            invoice_id: id,
            client_id: 7,
            client_first_name: "Ada".to_string(),
            client_last_name: "<Lovelace>".to_string(),
            total: Decimal::new(123450, 2),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            payment_method: "paypal".to_string(),
            status: "paid".to_string(),
        }
    }

    #[test]
    fn test_empty_table_shows_no_items() {
        let result = PageResult::new(vec![], 0, PageRequest::default());
        let html = render_sales_table(&result, &state());
        assert!(html.contains("No items!"));
    }

    #[test]
    fn test_table_row_is_escaped_and_capitalized() {
        let result = PageResult::new(vec![record(42)], 1, PageRequest::default());
        let html = render_sales_table(&result, &state());
        assert!(html.contains("invoices.php?action=edit&amp;id=42"));
        assert!(html.contains("clientssummary.php?userid=7"));
        assert!(html.contains("Ada &lt;Lovelace&gt;"));
        assert!(html.contains("1,234.50 USD"));
        assert!(html.contains(">Paypal<"));
        assert!(html.contains(">Paid<"));
        assert!(!html.contains("No items!"));
    }

    #[test]
    fn test_single_page_has_no_pagination() {
        let result = PageResult::new(vec![record(1)], 1, PageRequest::default());
        assert!(render_pagination(&result, &HashMap::new()).is_empty());
    }

    #[test]
    fn test_pagination_links_keep_filters() {
        let params: HashMap<String, String> = [
            ("status".to_string(), "Paid".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
        .into_iter()
        .collect();
        let result = PageResult::new(vec![record(1)], 250, PageRequest::new(2, 100));
        let html = render_pagination(&result, &params);

        assert!(html.contains("Previous"));
        assert!(html.contains("Next"));
        assert!(html.contains("/dashboard?page=1&amp;status=Paid"));
        assert!(html.contains("/sales/list?page=3&amp;status=Paid"));
        assert_eq!(html.matches("<li>").count(), 5);
    }

    #[test]
    fn test_first_page_has_no_previous() {
        let result = PageResult::new(vec![record(1)], 250, PageRequest::new(1, 100));
        let html = render_pagination(&result, &HashMap::new());
        assert!(!html.contains("Previous"));
        assert!(html.contains("Next"));
    }

    #[test]
    fn test_filter_form_marks_selection() {
        let params: HashMap<String, String> = [
            ("period".to_string(), "custom".to_string()),
            ("start_date".to_string(), "2024-01-01".to_string()),
            ("status".to_string(), "Unpaid".to_string()),
        ]
        .into_iter()
        .collect();
        let config = Config::default();
        let report = ReportParams::from_query(&params, &config);
        let html = render_filter_form(&report, &config);
        assert!(html.contains("<option value='custom' selected>Custom</option>"));
        assert!(html.contains("<option value='Unpaid' selected>Unpaid</option>"));
        assert!(html.contains("value='2024-01-01'"));
    }
}
