//! Application error types.
//!
//! Every failure the workbench can hit is one `AppError` variant. Handlers
//! turn errors into log messages; the JSON API turns them into the
//! `ApiResponse` error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::message::Severity;
use crate::response::ApiResponse;

/// Result alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

/// Application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before reaching the database server.
    #[error("{0}")]
    Validation(String),

    /// The database server could not be reached or refused the login.
    #[error("{0}")]
    DatabaseConnection(String),

    /// A statement failed on the server.
    #[error("{0}")]
    DatabaseQuery(String),

    /// The action needs a connection that is not open.
    #[error("{0}")]
    NotConnected(String),

    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    /// Error code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::DatabaseConnection(_) => "DATABASE_CONNECTION_ERROR",
            AppError::DatabaseQuery(_) => "DATABASE_QUERY_ERROR",
            AppError::NotConnected(_) => "NOT_CONNECTED",
            AppError::Template(_) => "TEMPLATE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// HTTP status code for API responses.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotConnected(_) => StatusCode::CONFLICT,
            AppError::DatabaseConnection(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Template(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Severity of the message shown in the console for this error.
    pub fn severity(&self) -> Severity {
        match self {
            AppError::Validation(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Text shown in the console message panel.
    ///
    /// Validation failures are shown as-is; driver failures carry the
    /// `Error: ` prefix followed by the driver text.
    pub fn console_text(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            other => format!("Error: {}", other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "请求处理失败");
        } else {
            tracing::debug!(code = self.code(), error = %self, "请求被拒绝");
        }
        let body = ApiResponse::err(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}
