//! SQLite-backed store over `tblinvoices`, `tblclients` and `tblhosting`

use super::{year_bounds, SalesStore};
use crate::error::{CoreError, CoreResult};
use crate::filter::{Predicate, TransactionQuery};
use crate::models::{Metric, MonthlyAggregate, PageRequest, StoreTotals, TransactionRecord};
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Minimal schema of the billing tables this store reads
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tblclients (
    id INTEGER PRIMARY KEY,
    firstname TEXT NOT NULL DEFAULT '',
    lastname TEXT NOT NULL DEFAULT '',
    datecreated TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tblinvoices (
    id INTEGER PRIMARY KEY,
    userid INTEGER NOT NULL,
    date TEXT NOT NULL,
    total NUMERIC NOT NULL DEFAULT 0,
    paymentmethod TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'Unpaid'
);
CREATE TABLE IF NOT EXISTS tblhosting (
    id INTEGER PRIMARY KEY,
    regdate TEXT NOT NULL
);
";

const JOINED_FROM: &str = "FROM tblinvoices i JOIN tblclients c ON i.userid = c.id";

/// Queries run on tokio's blocking pool, one at a time on the shared connection.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open an existing database read-only
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| CoreError::data_source(format!("{}: {}", path.display(), e)))?;
        log::info!("Opened billing database {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already configured connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn run<T, F>(&self, task: F) -> CoreResult<T>
    where
        F: FnOnce(&Connection) -> CoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| CoreError::Internal {
                message: "database connection lock poisoned".to_string(),
            })?;
            task(&guard)
        })
        .await
        .map_err(|e| CoreError::Internal {
            message: format!("query task failed: {}", e),
        })?
    }
}

#[async_trait]
impl SalesStore for SqliteStore {
    async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
        page: PageRequest,
    ) -> CoreResult<Vec<TransactionRecord>> {
        let query = query.clone();
        self.run(move |conn| query_transactions(conn, &query, page)).await
    }

    async fn count_transactions(&self, query: &TransactionQuery) -> CoreResult<u64> {
        let query = query.clone();
        self.run(move |conn| query_count(conn, &query)).await
    }

    async fn monthly_aggregate(&self, year: i32, metric: Metric) -> CoreResult<MonthlyAggregate> {
        self.run(move |conn| query_monthly(conn, year, metric)).await
    }

    async fn totals(&self) -> CoreResult<StoreTotals> {
        self.run(query_totals).await
    }
}

fn query_transactions(
    conn: &Connection,
    query: &TransactionQuery,
    page: PageRequest,
) -> CoreResult<Vec<TransactionRecord>> {
    let (where_sql, mut values) = where_clause(query);
    let sql = format!(
        "SELECT i.id, c.id, c.firstname, c.lastname, CAST(i.total AS TEXT), date(i.date), \
                i.paymentmethod, i.status \
         {} {} ORDER BY i.id ASC LIMIT ? OFFSET ?",
        JOINED_FROM, where_sql
    );
    values.push(Value::Integer(to_sql_int(page.limit())));
    values.push(Value::Integer(to_sql_int(page.offset())));

    let started = Instant::now();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            let total: String = row.get(4)?;
            Ok(TransactionRecord {
                invoice_id: row.get(0)?,
                client_id: row.get(1)?,
                client_first_name: row.get(2)?,
                client_last_name: row.get(3)?,
                total: parse_decimal(4, &total)?,
                date: row.get(5)?,
                payment_method: row.get(6)?,
                status: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "Fetched {} transactions (offset {}) in {:?}",
        rows.len(),
        page.offset(),
        started.elapsed()
    );
    Ok(rows)
}

fn query_count(conn: &Connection, query: &TransactionQuery) -> CoreResult<u64> {
    let (where_sql, values) = where_clause(query);
    let sql = format!("SELECT COUNT(*) {} {}", JOINED_FROM, where_sql);

    let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

fn query_monthly(conn: &Connection, year: i32, metric: Metric) -> CoreResult<MonthlyAggregate> {
    let (start, end) = year_bounds(year)?;
    let (table, date_column, value_expr) = metric_source(metric);
    let sql = format!(
        "SELECT CAST(strftime('%m', {date}) AS INTEGER) AS month, CAST({value} AS TEXT) \
         FROM {table} \
         WHERE date({date}) BETWEEN ?1 AND ?2 \
         GROUP BY month ORDER BY month",
        date = date_column,
        value = value_expr,
        table = table
    );

    let started = Instant::now();
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map(params![start, end], |row| {
            let month: u32 = row.get(0)?;
            let value: String = row.get(1)?;
            Ok((month, parse_decimal(1, &value)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "Aggregated {} for {} into {} months in {:?}",
        metric,
        year,
        entries.len(),
        started.elapsed()
    );
    Ok(MonthlyAggregate::with_values(year, metric, entries))
}

fn query_totals(conn: &Connection) -> CoreResult<StoreTotals> {
    let total_clients: i64 = conn.query_row("SELECT COUNT(*) FROM tblclients", [], |r| r.get(0))?;
    // large REAL sums come back in scientific notation, e.g. 1.0e+15
    let (total_invoices, total_sales): (i64, Decimal) = conn.query_row(
        "SELECT COUNT(*), CAST(COALESCE(SUM(total), 0) AS TEXT) FROM tblinvoices",
        [],
        |r| {
            let sum: String = r.get(1)?;
            Ok((r.get(0)?, parse_decimal(1, &sum)?))
        },
    )?;
    let total_services: i64 = conn.query_row("SELECT COUNT(*) FROM tblhosting", [], |r| r.get(0))?;

    Ok(StoreTotals {
        total_clients: total_clients.max(0) as u64,
        total_invoices: total_invoices.max(0) as u64,
        total_sales,
        total_services: total_services.max(0) as u64,
    })
}

/// Table, date column and aggregate expression for a metric
fn metric_source(metric: Metric) -> (&'static str, &'static str, &'static str) {
    match metric {
        Metric::SalesTotal => ("tblinvoices", "date", "SUM(total)"),
        Metric::InvoiceCount => ("tblinvoices", "date", "COUNT(id)"),
        Metric::ClientSignups => ("tblclients", "datecreated", "COUNT(id)"),
        Metric::ServiceActivations => ("tblhosting", "regdate", "COUNT(id)"),
    }
}

fn predicate_sql(predicate: &Predicate) -> (&'static str, Value) {
    match predicate {
        Predicate::DateOnOrAfter(start) => ("date(i.date) >= ?", Value::Text(start.to_string())),
        Predicate::DateOnOrBefore(end) => ("date(i.date) <= ?", Value::Text(end.to_string())),
        Predicate::StatusEquals(status) => ("i.status = ?", Value::Text(status.clone())),
    }
}

/// Render predicates as a WHERE clause with positional parameters
fn where_clause(query: &TransactionQuery) -> (String, Vec<Value>) {
    let (clauses, values): (Vec<&str>, Vec<Value>) =
        query.predicates().iter().map(predicate_sql).unzip();
    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!("WHERE {}", clauses.join(" AND ")), values)
    }
}

fn to_sql_int(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn parse_decimal(column: usize, text: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
