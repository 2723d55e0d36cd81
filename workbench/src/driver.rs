//! Database driver seam.
//!
//! The console only needs connect / execute / commit / is-connected from the
//! server. Keeping that behind traits lets the MySQL implementation live in
//! [`crate::mysql`] and lets tests script a server.

use async_trait::async_trait;
use common::errors::AppResult;
use common::models::{Credentials, TabularValue};

/// What a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutput {
    /// The statement returned column metadata; all rows are materialized.
    Rows(TabularValue),
    /// No row output (DML, DDL, administrative statements).
    Done { rows_affected: u64 },
}

/// Opens connections to a database server.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Connects with `credentials`, optionally scoped to `database`.
    ///
    /// # Errors
    /// `AppError::DatabaseConnection` carrying the driver's error text.
    async fn connect(
        &self,
        credentials: &Credentials,
        database: Option<&str>,
    ) -> AppResult<Box<dyn DbConnection>>;
}

/// A live connection.
#[async_trait]
pub trait DbConnection: Send {
    /// Database this connection is scoped to, if any.
    fn database(&self) -> Option<&str>;

    /// Sends one statement verbatim and fetches its full output.
    ///
    /// # Errors
    /// `AppError::DatabaseQuery` carrying the driver's error text.
    async fn execute(&mut self, sql: &str) -> AppResult<StatementOutput>;

    /// Commits the current transaction.
    async fn commit(&mut self) -> AppResult<()>;

    /// Round-trips to the server to check the connection is usable.
    async fn is_connected(&mut self) -> bool;
}
