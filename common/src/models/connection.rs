//! Connection credential models.

use serde::Deserialize;

use crate::errors::{AppError, AppResult};

/// Credentials for the database server.
///
/// Held in memory for the lifetime of the session only. `Debug` redacts the
/// password.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub host: String,
    /// Port as typed by the operator; parsed when connecting.
    pub port: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Parses the port into a TCP port number.
    ///
    /// # Errors
    /// Returns `AppError::DatabaseConnection` when the port is not a valid
    /// 16-bit number, so it is reported like any other connect failure.
    pub fn port_number(&self) -> AppResult<u16> {
        self.port
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::DatabaseConnection(format!("invalid port: {}", self.port)))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}
