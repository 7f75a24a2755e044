//! # Notiview - notification viewer for schema-unknown SQLite files
//!
//! Notiview opens an arbitrary SQLite byte buffer and presents its contents
//! as a uniform list of notification records (app, title, text, timestamp,
//! identifier), without knowing the database layout up front.
//!
//! Notiview provides:
//! - A database loader that materializes raw bytes into a queryable instance
//! - A schema resolver that discovers the notification table and maps its
//!   columns onto the canonical record shape
//! - Free-text filtering over resolved records
//! - A remote file source boundary for fetching database files

pub mod config;
pub mod filter;
pub mod loader;
pub mod output;
pub mod record;
pub mod remote;
pub mod resolver;

// Re-exports for convenient access
pub use filter::filter;
pub use loader::{ColumnDescriptor, Database, Scalar, Tabular};
pub use record::{NotificationRecord, Timestamp};
pub use resolver::resolve;

/// Result type alias for Notiview operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Notiview operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte buffer is not a readable SQLite database.
    #[error("Not a valid SQLite database: {0}")]
    CorruptDatabase(String),

    /// The table catalog could not be enumerated; resolution cannot proceed.
    #[error("Schema discovery failed: {0}")]
    SchemaDiscovery(String),

    /// A table literally named `notifications` exists but lacks an expected
    /// column. Fatal: the exact-name table is assumed well-formed, so there
    /// is no fallback to heuristic discovery.
    #[error("Notifications table mapping failed: {0}")]
    ExactTableMapping(String),

    /// A constructed query failed against a candidate table. Recoverable:
    /// the resolver logs it and continues scanning.
    #[error("Query against table '{0}' failed: {1}")]
    QueryExecution(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote source error: {0}")]
    Remote(String),
}
