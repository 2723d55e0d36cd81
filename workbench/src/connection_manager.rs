//! Server-level and database-level connection slots.

use std::sync::Arc;

use common::errors::{AppError, AppResult};
use common::models::Credentials;

use crate::driver::{DatabaseDriver, DbConnection};

/// Holds at most one server-level and one database-level connection.
///
/// Opening a connection replaces whatever the slot held before; a failed
/// attempt leaves the slot empty. Nothing is retried.
pub struct ConnectionManager {
    driver: Arc<dyn DatabaseDriver>,
    server: Option<Box<dyn DbConnection>>,
    database: Option<Box<dyn DbConnection>>,
}

impl ConnectionManager {
    pub fn new(driver: Arc<dyn DatabaseDriver>) -> Self {
        Self {
            driver,
            server: None,
            database: None,
        }
    }

    /// Connects without selecting a database.
    pub async fn open_server_connection(&mut self, credentials: &Credentials) -> AppResult<()> {
        self.server = None;
        let conn = self.open(credentials, None).await?;
        tracing::info!(host = %credentials.host, user = %credentials.user, "已连接数据库服务器");
        self.server = Some(conn);
        Ok(())
    }

    /// Connects scoped to `database`, replacing the current database-level
    /// connection.
    pub async fn open_database_connection(
        &mut self,
        credentials: &Credentials,
        database: &str,
    ) -> AppResult<()> {
        self.database = None;
        let conn = self.open(credentials, Some(database)).await?;
        tracing::info!(host = %credentials.host, database, "已连接数据库");
        self.database = Some(conn);
        Ok(())
    }

    async fn open(
        &mut self,
        credentials: &Credentials,
        database: Option<&str>,
    ) -> AppResult<Box<dyn DbConnection>> {
        let mut conn = self.driver.connect(credentials, database).await.map_err(|e| {
            tracing::warn!(host = %credentials.host, database, error = %e, "连接失败");
            e
        })?;
        if !conn.is_connected().await {
            return Err(AppError::DatabaseConnection(
                "server closed the connection right after login".into(),
            ));
        }
        Ok(conn)
    }

    pub fn server(&mut self) -> Option<&mut (dyn DbConnection + 'static)> {
        self.server.as_deref_mut()
    }

    pub fn database(&mut self) -> Option<&mut (dyn DbConnection + 'static)> {
        self.database.as_deref_mut()
    }

    pub fn has_server(&self) -> bool {
        self.server.is_some()
    }

    /// Name of the database the database-level connection is scoped to.
    pub fn database_name(&self) -> Option<&str> {
        self.database.as_deref().and_then(|conn| conn.database())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::driver::StatementOutput;

    struct Scripted {
        alive: bool,
    }

    #[async_trait]
    impl DatabaseDriver for Scripted {
        async fn connect(
            &self,
            _credentials: &Credentials,
            database: Option<&str>,
        ) -> AppResult<Box<dyn DbConnection>> {
            Ok(Box::new(Handle {
                alive: self.alive,
                database: database.map(str::to_string),
            }))
        }
    }

    struct Handle {
        alive: bool,
        database: Option<String>,
    }

    #[async_trait]
    impl DbConnection for Handle {
        fn database(&self) -> Option<&str> {
            self.database.as_deref()
        }

        async fn execute(&mut self, _sql: &str) -> AppResult<StatementOutput> {
            Ok(StatementOutput::Done { rows_affected: 0 })
        }

        async fn commit(&mut self) -> AppResult<()> {
            Ok(())
        }

        async fn is_connected(&mut self) -> bool {
            self.alive
        }
    }

    fn creds() -> Credentials {
        Credentials {
            host: "localhost".into(),
            port: "3306".into(),
            user: "root".into(),
            password: String::new(),
        }
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_open_futures_are_send() {
        let mut manager = ConnectionManager::new(Arc::new(Scripted { alive: true }));
        let creds = creds();
        assert_send(&manager.open_server_connection(&creds));
        assert_send(&manager.open_database_connection(&creds, "shop"));
    }

    #[tokio::test]
    async fn test_dead_handle_leaves_slot_empty() {
        let mut manager = ConnectionManager::new(Arc::new(Scripted { alive: false }));
        let err = manager
            .open_database_connection(&creds(), "shop")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DatabaseConnection(_)));
        assert!(manager.database_name().is_none());
        assert!(!manager.has_server());
    }
}
