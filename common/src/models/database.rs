//! Database catalog models.

use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// Databases visible to the server-level connection.
///
/// A failed listing is kept apart from an empty one.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Catalog {
    /// No server connection yet.
    #[default]
    NotLoaded,
    /// Names in the order the server returned them.
    Listed { databases: Vec<String> },
    /// The last listing attempt failed.
    Unavailable { reason: String },
}

impl Catalog {
    /// Listed names; empty unless the catalog is `Listed`.
    pub fn names(&self) -> &[String] {
        match self {
            Catalog::Listed { databases } => databases,
            _ => &[],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().iter().any(|db| db == name)
    }
}

/// Name for a database about to be created.
#[derive(Debug, Validate)]
pub struct NewDatabase {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

impl NewDatabase {
    /// Checks a requested name against the current listing.
    ///
    /// # Errors
    /// `AppError::Validation` when the name is already listed, blank, or too
    /// long. The server is never contacted for these.
    pub fn parse(raw: &str, catalog: &Catalog) -> AppResult<Self> {
        let name = raw.trim();
        if catalog.contains(name) {
            return Err(AppError::Validation(format!(
                "Database {} already exists, please select it from left panel.",
                name
            )));
        }
        let candidate = Self {
            name: name.to_string(),
        };
        candidate
            .validate()
            .map_err(|_| AppError::Validation("Please enter a valid database name.".into()))?;
        Ok(candidate)
    }
}
