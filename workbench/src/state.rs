//! Application state for the workbench.

use std::sync::Arc;

use common::config::AppConfig;
use tokio::sync::Mutex;

use crate::driver::DatabaseDriver;
use crate::session::Session;

/// Application state shared across handlers.
///
/// Handlers hold the session lock for their whole run, so actions execute
/// one at a time.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    /// Creates a new application state with an empty session.
    pub fn new(config: AppConfig, driver: Arc<dyn DatabaseDriver>) -> Self {
        let session = Session::new(driver, &config.form_defaults);
        Self {
            config,
            session: Arc::new(Mutex::new(session)),
        }
    }
}
