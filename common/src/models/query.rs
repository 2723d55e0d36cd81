//! SQL query models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// Row counts offered by the limit selector.
pub const ROW_LIMIT_CHOICES: [u32; 6] = [10, 50, 100, 200, 300, 500];

/// Row limit applied to `select` statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    Unlimited,
    Rows(u32),
}

impl Default for RowLimit {
    fn default() -> Self {
        RowLimit::Rows(100)
    }
}

impl RowLimit {
    /// Every selectable option, in display order.
    pub fn options() -> impl Iterator<Item = RowLimit> {
        std::iter::once(RowLimit::Unlimited).chain(ROW_LIMIT_CHOICES.into_iter().map(RowLimit::Rows))
    }

    pub fn rows(&self) -> Option<u32> {
        match self {
            RowLimit::Unlimited => None,
            RowLimit::Rows(n) => Some(*n),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RowLimit::Unlimited => "Don't Limit".to_string(),
            RowLimit::Rows(n) => format!("Limit to {} rows", n),
        }
    }

    /// Value submitted by the HTML selector.
    pub fn form_value(&self) -> String {
        match self {
            RowLimit::Unlimited => "none".to_string(),
            RowLimit::Rows(n) => n.to_string(),
        }
    }

    /// Parses a selector value.
    ///
    /// # Errors
    /// `AppError::Validation` for anything that is not one of the options.
    pub fn parse_form(value: &str) -> AppResult<Self> {
        match value.trim() {
            "" | "none" => Ok(RowLimit::Unlimited),
            other => other
                .parse::<u32>()
                .map_err(|_| invalid_limit(other))
                .and_then(RowLimit::try_from),
        }
    }
}

impl TryFrom<u32> for RowLimit {
    type Error = AppError;

    fn try_from(rows: u32) -> AppResult<Self> {
        if ROW_LIMIT_CHOICES.contains(&rows) {
            Ok(RowLimit::Rows(rows))
        } else {
            Err(invalid_limit(rows))
        }
    }
}

fn invalid_limit(value: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!(
        "Unsupported row limit {}; choose one of {:?}",
        value, ROW_LIMIT_CHOICES
    ))
}

/// Request body for `POST /api/query`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// SQL statement to execute.
    pub sql: String,

    /// Row limit for `select` statements; omitted means no limit.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl QueryRequest {
    pub fn row_limit(&self) -> AppResult<RowLimit> {
        self.limit
            .map(RowLimit::try_from)
            .transpose()
            .map(|limit| limit.unwrap_or(RowLimit::Unlimited))
    }
}

/// Materialized result set: column names plus rows of scalar values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TabularValue {
    /// Column names in the order the server returned them.
    pub columns: Vec<String>,

    /// Rows; every row has one value per column.
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl TabularValue {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
