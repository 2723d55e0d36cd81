//! Database listing and creation over the server-level connection.

use common::errors::AppResult;
use common::models::NewDatabase;
use common::utils::SqlText;
use serde_json::Value;

use crate::driver::{DbConnection, StatementOutput};

/// Lists databases visible to the connection, in server order.
pub async fn list_databases(conn: &mut dyn DbConnection) -> AppResult<Vec<String>> {
    let names = match conn.execute("SHOW DATABASES").await? {
        StatementOutput::Rows(table) => table
            .rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(|cell| match cell {
                Value::String(name) => name,
                other => other.to_string(),
            })
            .collect(),
        StatementOutput::Done { .. } => Vec::new(),
    };
    Ok(names)
}

/// Issues `CREATE DATABASE` for an already validated name.
pub async fn create_database(conn: &mut dyn DbConnection, new_db: &NewDatabase) -> AppResult<()> {
    let sql = format!("CREATE DATABASE {}", SqlText::identifier(&new_db.name));
    conn.execute(&sql).await?;
    tracing::info!(database = %new_db.name, "数据库已创建");
    Ok(())
}
