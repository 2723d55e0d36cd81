//! MySQL driver built on sqlx.
//!
//! Statements go over the text protocol so administrative commands that
//! cannot be prepared (`USE`, `CREATE DATABASE`, ...) work as typed.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlRow};
use sqlx::{Column, Connection, Executor, MySqlConnection, Row, TypeInfo, ValueRef};

use common::errors::{AppError, AppResult};
use common::models::{Credentials, TabularValue};
use common::utils::SqlText;

use crate::driver::{DatabaseDriver, DbConnection, StatementOutput};

/// Connects to MySQL-compatible servers.
pub struct MySqlDriver {
    connect_timeout: Duration,
}

impl MySqlDriver {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl DatabaseDriver for MySqlDriver {
    async fn connect(
        &self,
        credentials: &Credentials,
        database: Option<&str>,
    ) -> AppResult<Box<dyn DbConnection>> {
        let port = credentials.port_number()?;
        let mut options = MySqlConnectOptions::new()
            .host(credentials.host.trim())
            .port(port)
            .username(&credentials.user)
            .password(&credentials.password);
        if let Some(database) = database {
            options = options.database(database);
        }

        tracing::debug!(host = %credentials.host, port, user = %credentials.user, database, "连接数据库服务器");

        let conn = tokio::time::timeout(self.connect_timeout, MySqlConnection::connect_with(&options))
            .await
            .map_err(|_| {
                AppError::DatabaseConnection(format!(
                    "connection attempt timed out after {}s",
                    self.connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::DatabaseConnection(driver_text(&e)))?;

        Ok(Box::new(MySqlSession {
            conn,
            database: database.map(str::to_string),
        }))
    }
}

/// One open MySQL connection.
struct MySqlSession {
    conn: MySqlConnection,
    database: Option<String>,
}

#[async_trait]
impl DbConnection for MySqlSession {
    fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    async fn execute(&mut self, sql: &str) -> AppResult<StatementOutput> {
        // describe 只做预处理；无法预处理的语句（如 USE）返回 None
        let described: Option<Vec<String>> = (&mut self.conn)
            .describe(sql)
            .await
            .ok()
            .map(|d| d.columns().iter().map(|c| c.name().to_string()).collect());

        match Plan::for_statement(sql, described) {
            Plan::Fetch(columns) => {
                let rows = (&mut self.conn).fetch_all(sql).await.map_err(query_error)?;
                Ok(StatementOutput::Rows(to_tabular(columns, &rows)))
            }
            Plan::Execute => {
                let result = (&mut self.conn).execute(sql).await.map_err(query_error)?;
                Ok(StatementOutput::Done {
                    rows_affected: result.rows_affected(),
                })
            }
            Plan::FetchUndescribed { expects_rows } => {
                let rows = (&mut self.conn).fetch_all(sql).await.map_err(query_error)?;
                let columns = rows
                    .first()
                    .map(|first| first.columns().iter().map(|c| c.name().to_string()).collect());
                Ok(undescribed_output(expects_rows, columns, &rows))
            }
        }
    }

    async fn commit(&mut self) -> AppResult<()> {
        (&mut self.conn).execute("COMMIT").await.map_err(query_error)?;
        Ok(())
    }

    async fn is_connected(&mut self) -> bool {
        self.conn.ping().await.is_ok()
    }
}

/// How the output of one statement is collected.
#[derive(Debug, PartialEq)]
enum Plan {
    /// Prepared with column metadata: a result set, possibly empty.
    Fetch(Vec<String>),
    /// Prepared without columns: no result set.
    Execute,
    /// Could not be prepared. Columns are taken from the first row; with no
    /// rows the leading keyword decides whether it was a result set.
    FetchUndescribed { expects_rows: bool },
}

impl Plan {
    fn for_statement(sql: &str, described: Option<Vec<String>>) -> Self {
        match described {
            Some(columns) if !columns.is_empty() => Plan::Fetch(columns),
            Some(_) => Plan::Execute,
            None => Plan::FetchUndescribed {
                expects_rows: SqlText::returns_rows(sql),
            },
        }
    }
}

fn undescribed_output(
    expects_rows: bool,
    columns: Option<Vec<String>>,
    rows: &[MySqlRow],
) -> StatementOutput {
    match columns {
        Some(columns) => StatementOutput::Rows(to_tabular(columns, rows)),
        None if expects_rows => StatementOutput::Rows(TabularValue::new(Vec::new(), Vec::new())),
        None => StatementOutput::Done { rows_affected: 0 },
    }
}

fn to_tabular(columns: Vec<String>, rows: &[MySqlRow]) -> TabularValue {
    let width = columns.len();
    let rows = rows
        .iter()
        .map(|row| (0..width).map(|i| cell_value(row, i)).collect())
        .collect();
    TabularValue::new(columns, rows)
}

/// Decodes one cell into a JSON scalar.
///
/// Integer and floating point columns become numbers; everything else is
/// shown as text. Non UTF-8 binary values are rendered as hex.
fn cell_value(row: &MySqlRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    let text = match row.try_get_unchecked::<String, _>(index) {
        Ok(text) => text,
        Err(_) => {
            return match row.try_get_unchecked::<Vec<u8>, _>(index) {
                Ok(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
                Err(_) => Value::Null,
            };
        }
    };

    if type_name.contains("INT") && type_name != "POINT" {
        if let Ok(n) = text.parse::<i64>() {
            return Value::from(n);
        }
        if let Ok(n) = text.parse::<u64>() {
            return Value::from(n);
        }
    } else if type_name == "FLOAT" || type_name == "DOUBLE" {
        if let Some(n) = text.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(text)
}

fn query_error(e: sqlx::Error) -> AppError {
    AppError::DatabaseQuery(driver_text(&e))
}

/// Server errors keep MySQL's own `code (state): message` text.
fn driver_text(e: &sqlx::Error) -> String {
    match e.as_database_error() {
        Some(db_err) => db_err.to_string(),
        None => e.to_string(),
    }
}
