//! Shared data models.

pub mod connection;
pub mod database;
pub mod message;
pub mod query;

// Re-export commonly used types
pub use connection::Credentials;
pub use database::{Catalog, NewDatabase};
pub use message::{Message, MessageLog, Severity};
pub use query::{QueryRequest, RowLimit, TabularValue};
