//! DuckDB-backed warehouse session.

use chrono::NaiveDate;
use duckdb::{params, Connection, ToSql};
use markets_core::error::DataError;
use markets_core::traits::WarehouseSession;
use markets_core::types::{RawFxRow, RawStockRow};
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Default name of the long-format stock table.
pub const STOCK_TABLE: &str = "STOCK_PRICE_TIMESERIES";

/// Default name of the FX rates table.
pub const FX_TABLE: &str = "FX_RATES_TIMESERIES";

/// Warehouse connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub account: String,
    pub user: String,
    pub password: Option<String>,
    pub role: String,
    pub warehouse: String,
    /// Database file path; empty or `:memory:` opens an in-memory database
    pub database: String,
    pub schema: String,
    pub stock_table: String,
    pub fx_table: String,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            account: String::new(),
            user: String::new(),
            password: None,
            role: String::new(),
            warehouse: String::new(),
            database: ":memory:".to_string(),
            schema: "cybersyn".to_string(),
            stock_table: STOCK_TABLE.to_string(),
            fx_table: FX_TABLE.to_string(),
        }
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("role", &self.role)
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("stock_table", &self.stock_table)
            .field("fx_table", &self.fx_table)
            .finish()
    }
}

impl ConnectionParams {
    /// Check identifiers before they are spliced into SQL.
    pub fn validate(&self) -> Result<(), DataError> {
        for (what, value) in [
            ("schema", &self.schema),
            ("stock table", &self.stock_table),
            ("fx table", &self.fx_table),
        ] {
            if !is_identifier(value) {
                return Err(DataError::InvalidArgument(format!(
                    "{what} '{value}' is not a valid identifier"
                )));
            }
        }
        Ok(())
    }

    fn is_in_memory(&self) -> bool {
        self.database.is_empty() || self.database == ":memory:"
    }

    fn stock_relation(&self) -> String {
        format!("{}.{}", self.schema, self.stock_table)
    }

    fn fx_relation(&self) -> String {
        format!("{}.{}", self.schema, self.fx_table)
    }
}

/// A read session against a DuckDB database holding the source tables.
pub struct DuckDbSession {
    params: ConnectionParams,
    connection: Mutex<Connection>,
}

impl fmt::Debug for DuckDbSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuckDbSession")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl DuckDbSession {
    /// Establish a session.
    ///
    /// # Errors
    /// `Connection` when the database cannot be opened or does not answer a
    /// probe query; `InvalidArgument` for malformed identifiers.
    pub fn connect(params: ConnectionParams) -> Result<Self, DataError> {
        params.validate()?;

        let connection = if params.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&params.database)
        }
        .map_err(|e| DataError::Connection(e.to_string()))?;

        connection
            .execute_batch("PRAGMA disable_progress_bar;")
            .and_then(|_| connection.query_row("SELECT 1", [], |row| row.get::<_, i32>(0)))
            .map_err(|e| DataError::Connection(e.to_string()))?;

        info!(
            account = %params.account,
            user = %params.user,
            role = %params.role,
            warehouse = %params.warehouse,
            database = %params.database,
            schema = %params.schema,
            "Warehouse session established"
        );

        Ok(Self {
            params,
            connection: Mutex::new(connection),
        })
    }

    /// Connection parameters of this session.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Create the source tables if they are missing.
    pub fn ensure_tables(&self) -> Result<(), DataError> {
        let sql = format!(
            r#"
CREATE SCHEMA IF NOT EXISTS {schema};
CREATE TABLE IF NOT EXISTS {stocks} (
    TICKER VARCHAR NOT NULL,
    DATE DATE NOT NULL,
    VARIABLE_NAME VARCHAR NOT NULL,
    VALUE DOUBLE
);
CREATE TABLE IF NOT EXISTS {fx} (
    BASE_CURRENCY_ID VARCHAR NOT NULL,
    QUOTE_CURRENCY_NAME VARCHAR NOT NULL,
    VARIABLE_NAME VARCHAR NOT NULL,
    DATE DATE NOT NULL,
    VALUE DOUBLE NOT NULL
);
"#,
            schema = self.params.schema,
            stocks = self.params.stock_relation(),
            fx = self.params.fx_relation(),
        );
        self.lock()?.execute_batch(&sql).map_err(query_error)
    }

    /// Append raw stock rows in one transaction.
    pub fn seed_stock_rows(&self, rows: &[RawStockRow]) -> Result<usize, DataError> {
        self.ensure_tables()?;
        let sql = format!(
            "INSERT INTO {} (TICKER, DATE, VARIABLE_NAME, VALUE) VALUES (?, CAST(? AS DATE), ?, ?)",
            self.params.stock_relation()
        );

        let connection = self.lock()?;
        in_transaction(&connection, |connection| {
            let mut statement = connection.prepare(&sql)?;
            for row in rows {
                statement.execute(params![
                    row.ticker,
                    row.date.to_string(),
                    row.variable_name,
                    row.value
                ])?;
            }
            Ok(rows.len())
        })
    }

    /// Append raw FX rows in one transaction.
    pub fn seed_fx_rows(&self, rows: &[RawFxRow]) -> Result<usize, DataError> {
        self.ensure_tables()?;
        let sql = format!(
            "INSERT INTO {} (BASE_CURRENCY_ID, QUOTE_CURRENCY_NAME, VARIABLE_NAME, DATE, VALUE) \
             VALUES (?, ?, ?, CAST(? AS DATE), ?)",
            self.params.fx_relation()
        );

        let connection = self.lock()?;
        in_transaction(&connection, |connection| {
            let mut statement = connection.prepare(&sql)?;
            for row in rows {
                statement.execute(params![
                    row.base_currency_id,
                    row.quote_currency_name,
                    row.variable_name,
                    row.date.to_string(),
                    row.value
                ])?;
            }
            Ok(rows.len())
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DataError> {
        self.connection
            .lock()
            .map_err(|_| DataError::Query("warehouse connection lock poisoned".to_string()))
    }
}

impl WarehouseSession for DuckDbSession {
    fn stock_rows(
        &self,
        tickers: &[String],
        variables: &[&str],
    ) -> Result<Vec<RawStockRow>, DataError> {
        if tickers.is_empty() || variables.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT TICKER, CAST(DATE AS VARCHAR), VARIABLE_NAME, VALUE FROM {} \
             WHERE TICKER IN ({}) AND VARIABLE_NAME IN ({})",
            self.params.stock_relation(),
            placeholders(tickers.len()),
            placeholders(variables.len()),
        );
        let variables: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
        let bound: Vec<&dyn ToSql> = tickers
            .iter()
            .chain(variables.iter())
            .map(|value| value as &dyn ToSql)
            .collect();

        let connection = self.lock()?;
        let mut statement = connection.prepare(&sql).map_err(query_error)?;
        let raw = statement
            .query_map(&bound[..], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                ))
            })
            .map_err(query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error)?;

        debug!(rows = raw.len(), "Stock rows query finished");
        raw.into_iter()
            .map(|(ticker, date, variable_name, value)| {
                Ok(RawStockRow {
                    ticker,
                    date: parse_sql_date(&date)?,
                    variable_name,
                    value,
                })
            })
            .collect()
    }

    fn fx_rows(&self, base_currency: &str, min_date: NaiveDate) -> Result<Vec<RawFxRow>, DataError> {
        let sql = format!(
            "SELECT BASE_CURRENCY_ID, QUOTE_CURRENCY_NAME, VARIABLE_NAME, CAST(DATE AS VARCHAR), VALUE \
             FROM {} WHERE BASE_CURRENCY_ID = ? AND DATE >= CAST(? AS DATE)",
            self.params.fx_relation(),
        );

        let connection = self.lock()?;
        let mut statement = connection.prepare(&sql).map_err(query_error)?;
        let raw = statement
            .query_map(params![base_currency.to_string(), min_date.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            })
            .map_err(query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error)?;

        debug!(rows = raw.len(), "FX rows query finished");
        raw.into_iter()
            .map(|(base_currency_id, quote_currency_name, variable_name, date, value)| {
                Ok(RawFxRow {
                    base_currency_id,
                    quote_currency_name,
                    variable_name,
                    date: parse_sql_date(&date)?,
                    value,
                })
            })
            .collect()
    }

    fn name(&self) -> &str {
        "duckdb"
    }
}

fn in_transaction<T>(
    connection: &Connection,
    body: impl FnOnce(&Connection) -> Result<T, duckdb::Error>,
) -> Result<T, DataError> {
    connection
        .execute_batch("BEGIN TRANSACTION")
        .map_err(query_error)?;
    match body(connection) {
        Ok(value) => {
            connection.execute_batch("COMMIT").map_err(query_error)?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(query_error(error))
        }
    }
}

fn query_error(error: duckdb::Error) -> DataError {
    DataError::Query(error.to_string())
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn parse_sql_date(value: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DataError::Parse(format!("Could not parse date '{}': {}", value, e)))
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
