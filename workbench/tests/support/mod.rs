//! Scripted database server and request helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::config::AppConfig;
use common::errors::{AppError, AppResult};
use common::models::{Credentials, TabularValue};
use workbench::driver::{DatabaseDriver, DbConnection, StatementOutput};
use workbench::state::AppState;

pub const PASSWORD: &str = "secret";

/// What the fake server holds and everything it was asked to do.
#[derive(Debug, Default)]
pub struct ServerState {
    pub databases: Vec<String>,
    /// `(database, statement)` for every statement received.
    pub statements: Vec<(Option<String>, String)>,
    pub fail_listing: bool,
    /// Connections report themselves dead right after login.
    pub drop_after_login: bool,
}

impl ServerState {
    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.statements
            .iter()
            .filter(|(_, sql)| sql.to_uppercase().starts_with(prefix))
            .count()
    }

    pub fn last_statement(&self) -> Option<&str> {
        self.statements.last().map(|(_, sql)| sql.as_str())
    }
}

#[derive(Clone)]
pub struct StubDriver {
    pub server: Arc<Mutex<ServerState>>,
}

#[async_trait]
impl DatabaseDriver for StubDriver {
    async fn connect(
        &self,
        credentials: &Credentials,
        database: Option<&str>,
    ) -> AppResult<Box<dyn DbConnection>> {
        credentials.port_number()?;
        if credentials.password != PASSWORD {
            return Err(AppError::DatabaseConnection(format!(
                "1045 (28000): Access denied for user '{}'@'localhost' (using password: YES)",
                credentials.user
            )));
        }
        if let Some(db) = database {
            if !self.server.lock().unwrap().databases.iter().any(|d| d == db) {
                return Err(AppError::DatabaseConnection(format!(
                    "1049 (42000): Unknown database '{}'",
                    db
                )));
            }
        }
        Ok(Box::new(StubConnection {
            server: self.server.clone(),
            database: database.map(str::to_string),
        }))
    }
}

pub struct StubConnection {
    server: Arc<Mutex<ServerState>>,
    database: Option<String>,
}

#[async_trait]
impl DbConnection for StubConnection {
    fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    async fn execute(&mut self, sql: &str) -> AppResult<StatementOutput> {
        let mut server = self.server.lock().unwrap();
        server.statements.push((self.database.clone(), sql.to_string()));
        let upper = sql.trim().to_uppercase();

        if upper == "SHOW DATABASES" {
            if server.fail_listing {
                return Err(AppError::DatabaseQuery(
                    "1227 (42000): Access denied; you need the SHOW DATABASES privilege".into(),
                ));
            }
            let rows = server.databases.iter().map(|d| vec![json!(d)]).collect();
            return Ok(StatementOutput::Rows(TabularValue::new(vec!["Database".into()], rows)));
        }
        if upper == "SHOW TABLES" {
            let db = self.database.clone().unwrap_or_default();
            return Ok(StatementOutput::Rows(TabularValue::new(
                vec![format!("Tables_in_{}", db)],
                vec![vec![json!("orders")], vec![json!("products")]],
            )));
        }
        if let Some(name) = upper.strip_prefix("CREATE DATABASE ") {
            let name = sql.trim()[sql.trim().len() - name.len()..].trim_matches('`').to_string();
            server.databases.push(name);
            return Ok(StatementOutput::Done { rows_affected: 1 });
        }
        if upper.contains("MISSING_TABLE") {
            return Err(AppError::DatabaseQuery(
                "1146 (42S02): Table 'shop.missing_table' doesn't exist".into(),
            ));
        }
        if upper.starts_with("SELECT") {
            return Ok(StatementOutput::Rows(TabularValue::new(
                vec!["id".into(), "name".into()],
                vec![vec![json!(1), json!("apple")], vec![json!(2), Value::Null]],
            )));
        }
        Ok(StatementOutput::Done { rows_affected: 0 })
    }

    async fn commit(&mut self) -> AppResult<()> {
        Ok(())
    }

    async fn is_connected(&mut self) -> bool {
        !self.server.lock().unwrap().drop_after_login
    }
}

pub struct TestApp {
    pub router: Router,
    pub server: Arc<Mutex<ServerState>>,
}

impl TestApp {
    pub fn new() -> Self {
        let server = Arc::new(Mutex::new(ServerState {
            databases: vec!["information_schema".into(), "mysql".into(), "shop".into()],
            ..Default::default()
        }));
        let driver = Arc::new(StubDriver {
            server: server.clone(),
        });
        let state = AppState::new(AppConfig::default(), driver);
        Self {
            router: workbench::create_router(state),
            server,
        }
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = serde_urlencoded::to_string(fields).unwrap();
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {}", path);
        response
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, serde_json::from_slice(&read_body(response).await).unwrap())
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::get(path).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, read_body(response).await)
    }

    pub async fn page(&self) -> String {
        let (status, body) = self.get("/").await;
        assert_eq!(status, StatusCode::OK);
        String::from_utf8(body).unwrap()
    }

    /// `data` of `GET /api/session`.
    pub async fn session(&self) -> Value {
        let (status, body) = self.get("/api/session").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        json["data"].clone()
    }

    pub async fn login(&self) {
        self.post_form(
            "/login",
            &[("host", "localhost"), ("port", "3306"), ("user", "root"), ("password", PASSWORD)],
        )
        .await;
    }

    pub async fn login_and_select(&self, database: &str) {
        self.login().await;
        self.post_form("/databases/select", &[("database", database)]).await;
    }
}

async fn read_body(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Texts of the logged messages, oldest first.
pub fn message_texts(session: &Value) -> Vec<String> {
    session["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap().to_string())
        .collect()
}
