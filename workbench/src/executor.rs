//! Runs one statement and classifies what came back.
//!
//! `execute` never touches the session; it returns an [`Outcome`] and the
//! caller decides what to store and show.

use common::errors::AppError;
use common::models::{Message, RowLimit, TabularValue};
use common::utils::SqlText;

use crate::driver::{DbConnection, StatementOutput};

/// Result of one execution request.
#[derive(Debug)]
pub enum Outcome {
    /// Refused before anything was sent.
    Rejected(AppError),
    /// The statement produced a result set.
    Rows {
        statement: String,
        table: TabularValue,
    },
    /// The statement produced no rows and was committed.
    Acknowledged {
        statement: String,
        rows_affected: u64,
    },
    /// The server rejected the statement.
    Failed { statement: String, error: AppError },
}

impl Outcome {
    /// Status message describing the outcome.
    pub fn message(&self) -> Message {
        match self {
            Outcome::Rejected(error) | Outcome::Failed { error, .. } => {
                Message::new(error.severity(), error.console_text())
            }
            Outcome::Rows { statement, .. } | Outcome::Acknowledged { statement, .. } => {
                Message::info(format!("{} executed successfully.", statement))
            }
        }
    }

    /// Whether the statement reached the server.
    pub fn was_sent(&self) -> bool {
        !matches!(self, Outcome::Rejected(_))
    }
}

/// Executes `raw` on `conn`, applying `limit` to `select` statements.
pub async fn execute(conn: &mut dyn DbConnection, raw: &str, limit: RowLimit) -> Outcome {
    if raw.trim().is_empty() {
        return Outcome::Rejected(AppError::Validation("Please enter a valid SQL query.".into()));
    }

    let statement = SqlText::with_row_limit(raw, limit);
    tracing::info!(database = conn.database(), statement = %statement, "执行 SQL");

    let started = std::time::Instant::now();
    let output = match conn.execute(&statement).await {
        Ok(output) => output,
        Err(error) => {
            tracing::warn!(error = %error, "SQL 执行失败");
            return Outcome::Failed { statement, error };
        }
    };

    match output {
        StatementOutput::Rows(table) => {
            tracing::info!(
                rows = table.row_count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "查询完成"
            );
            Outcome::Rows { statement, table }
        }
        StatementOutput::Done { rows_affected } => {
            if let Err(error) = conn.commit().await {
                tracing::warn!(error = %error, "提交失败");
                return Outcome::Failed { statement, error };
            }
            tracing::info!(rows_affected, "语句已提交");
            Outcome::Acknowledged {
                statement,
                rows_affected,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::errors::AppResult;
    use common::models::Severity;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<String>,
        commits: usize,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl DbConnection for Recorder {
        fn database(&self) -> Option<&str> {
            Some("shop")
        }

        async fn execute(&mut self, sql: &str) -> AppResult<StatementOutput> {
            self.sent.push(sql.to_string());
            if let Some(text) = &self.fail_with {
                return Err(AppError::DatabaseQuery(text.clone()));
            }
            if SqlText::is_select(sql) {
                Ok(StatementOutput::Rows(TabularValue::new(
                    vec!["id".into()],
                    vec![vec![json!(1)]],
                )))
            } else {
                Ok(StatementOutput::Done { rows_affected: 3 })
            }
        }

        async fn commit(&mut self) -> AppResult<()> {
            self.commits += 1;
            Ok(())
        }

        async fn is_connected(&mut self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_blank_query_is_not_sent() {
        let mut conn = Recorder::default();
        let outcome = execute(&mut conn, "  \n\t", RowLimit::default()).await;
        assert!(!outcome.was_sent());
        assert!(conn.sent.is_empty());
        let msg = outcome.message();
        assert_eq!(msg.severity, Severity::Warning);
        assert_eq!(msg.text, "Please enter a valid SQL query.");
    }

    #[tokio::test]
    async fn test_select_gets_limit_and_rows() {
        let mut conn = Recorder::default();
        let outcome = execute(&mut conn, "select * from t", RowLimit::Rows(100)).await;
        assert_eq!(conn.sent, vec!["select * from t LIMIT 100"]);
        assert_eq!(conn.commits, 0);
        assert!(matches!(outcome, Outcome::Rows { .. }));
        assert_eq!(
            outcome.message(),
            Message::info("select * from t LIMIT 100 executed successfully.")
        );
    }

    #[tokio::test]
    async fn test_non_select_is_sent_verbatim_and_committed() {
        let mut conn = Recorder::default();
        let outcome = execute(&mut conn, "delete from t where id = 1", RowLimit::Rows(100)).await;
        assert_eq!(conn.sent, vec!["delete from t where id = 1"]);
        assert_eq!(conn.commits, 1);
        assert!(matches!(outcome, Outcome::Acknowledged { rows_affected: 3, .. }));
    }

    #[tokio::test]
    async fn test_driver_failure_is_error_message() {
        let mut conn = Recorder {
            fail_with: Some("1064 (42000): You have an error in your SQL syntax".into()),
            ..Default::default()
        };
        let outcome = execute(&mut conn, "selec 1", RowLimit::Unlimited).await;
        assert!(outcome.was_sent());
        let msg = outcome.message();
        assert_eq!(msg.severity, Severity::Error);
        assert_eq!(msg.text, "Error: 1064 (42000): You have an error in your SQL syntax");
    }
}
