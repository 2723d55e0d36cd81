//! Console session.
//!
//! All mutable state of the console lives here and is passed by reference
//! to the actions. Actions record their outcome in the message log; they
//! never render.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use common::config::FormDefaults;
use common::errors::AppError;
use common::models::{Catalog, Credentials, Message, MessageLog, NewDatabase, RowLimit, TabularValue};
use common::utils::SqlText;

use crate::catalog;
use crate::connection_manager::ConnectionManager;
use crate::driver::DatabaseDriver;
use crate::executor::{self, Outcome};

/// Last values submitted through the forms, echoed back into the page.
#[derive(Debug, Clone)]
pub struct FormState {
    pub host: String,
    pub port: String,
    pub user: String,
    pub selected_database: Option<String>,
    pub new_database: String,
    pub query: String,
    pub limit: RowLimit,
}

impl From<&FormDefaults> for FormState {
    fn from(defaults: &FormDefaults) -> Self {
        Self {
            host: defaults.db_host.clone(),
            port: defaults.db_port.clone(),
            user: defaults.db_user.clone(),
            selected_database: None,
            new_database: String::new(),
            query: String::new(),
            limit: RowLimit::default(),
        }
    }
}

/// Console state for the single operator of this process.
pub struct Session {
    connections: ConnectionManager,
    credentials: Option<Credentials>,
    messages: MessageLog,
    result: Option<TabularValue>,
    catalog: Catalog,
    pub form: FormState,
}

impl Session {
    pub fn new(driver: Arc<dyn DatabaseDriver>, defaults: &FormDefaults) -> Self {
        Self {
            connections: ConnectionManager::new(driver),
            credentials: None,
            messages: MessageLog::new(),
            result: None,
            catalog: Catalog::NotLoaded,
            form: FormState::from(defaults),
        }
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn result(&self) -> Option<&TabularValue> {
        self.result.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn has_server_connection(&self) -> bool {
        self.connections.has_server()
    }

    /// Database the query area is bound to.
    pub fn current_database(&self) -> Option<&str> {
        self.connections.database_name()
    }

    fn log(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Logs an error with the severity its kind calls for.
    pub fn report(&mut self, error: &AppError) {
        self.log(Message::new(error.severity(), error.console_text()));
    }

    /// Opens the server-level connection and loads the catalog.
    pub async fn login(&mut self, credentials: Credentials) {
        self.form.host = credentials.host.clone();
        self.form.port = credentials.port.clone();
        self.form.user = credentials.user.clone();

        match self.connections.open_server_connection(&credentials).await {
            Ok(()) => {
                self.log(Message::success("Connected to MySQL Server"));
                self.credentials = Some(credentials);
                self.refresh_catalog().await;
            }
            Err(e) => {
                self.report(&e);
                self.catalog = Catalog::NotLoaded;
            }
        }
    }

    /// Re-reads the database listing over the server-level connection.
    pub async fn refresh_catalog(&mut self) {
        let Some(server) = self.connections.server() else {
            self.catalog = Catalog::NotLoaded;
            return;
        };
        match catalog::list_databases(server).await {
            Ok(databases) => self.catalog = Catalog::Listed { databases },
            Err(e) => {
                self.catalog = Catalog::Unavailable {
                    reason: e.to_string(),
                };
                self.report(&e);
            }
        }
    }

    /// Connects to an existing database and makes it current.
    ///
    /// `None` or an empty name is the "No Database Selected" placeholder.
    pub async fn select_database(&mut self, database: Option<&str>) {
        let Some(database) = database.map(str::trim).filter(|db| !db.is_empty()) else {
            self.log(Message::warning("Please select a valid database."));
            return;
        };
        self.form.selected_database = Some(database.to_string());
        self.switch_database(database).await;
    }

    /// Creates a database, then connects to it.
    pub async fn create_database(&mut self, raw_name: &str) {
        self.form.new_database = raw_name.to_string();
        let new_db = match NewDatabase::parse(raw_name, &self.catalog) {
            Ok(new_db) => new_db,
            Err(e) => {
                self.report(&e);
                return;
            }
        };
        let Some(server) = self.connections.server() else {
            self.report(&AppError::NotConnected("Please login first.".into()));
            return;
        };

        if let Err(e) = catalog::create_database(server, &new_db).await {
            self.report(&e);
            return;
        }
        self.log(Message::success(format!(
            "Database {} created successfully",
            new_db.name
        )));
        self.refresh_catalog().await;

        self.form.new_database.clear();
        self.form.selected_database = Some(new_db.name.clone());
        self.switch_database(&new_db.name).await;
    }

    async fn switch_database(&mut self, database: &str) {
        let Some(credentials) = self.credentials.clone() else {
            self.report(&AppError::NotConnected("Please login first.".into()));
            return;
        };
        match self
            .connections
            .open_database_connection(&credentials, database)
            .await
        {
            Ok(()) => {
                self.log(Message::success(format!(
                    "Connected to MySQL database: {}",
                    database
                )));
                let use_statement = format!("USE {}", SqlText::identifier(database));
                self.run(&use_statement, RowLimit::Unlimited).await;
            }
            Err(e) => self.report(&e),
        }
    }

    /// Executes the query box contents with the chosen limit.
    pub async fn execute_query(&mut self, sql: &str, limit: RowLimit) {
        self.form.query = sql.to_string();
        self.form.limit = limit;
        self.run(sql, limit).await;
    }

    /// Runs a fixed statement from one of the shortcut buttons.
    pub async fn run_shortcut(&mut self, sql: &str) {
        self.run(sql, RowLimit::Unlimited).await;
    }

    async fn run(&mut self, sql: &str, limit: RowLimit) {
        let Some(conn) = self.connections.database() else {
            self.report(&AppError::NotConnected(
                "Please connect to a database to execute queries.".into(),
            ));
            return;
        };
        let outcome = executor::execute(conn, sql, limit).await;
        let sent = outcome.was_sent();
        self.apply(outcome);
        if sent && self.connections.has_server() {
            self.refresh_catalog().await;
        }
    }

    /// Stores the outcome of an execution and logs its message.
    pub fn apply(&mut self, outcome: Outcome) {
        let message = outcome.message();
        match outcome {
            Outcome::Rejected(_) => {}
            Outcome::Rows { table, .. } => self.result = Some(table),
            Outcome::Acknowledged { .. } | Outcome::Failed { .. } => self.result = None,
        }
        self.log(message);
    }

    /// Serializable view of the session for the JSON API.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            server_connected: self.has_server_connection(),
            database: self.current_database().map(str::to_string),
            catalog: self.catalog.clone(),
            messages: self.messages.to_vec(),
            result: self.result.clone(),
        }
    }
}

/// Session state as returned by `GET /api/session`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub server_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub catalog: Catalog,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TabularValue>,
}
