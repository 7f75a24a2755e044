//! Remote file source boundary
//!
//! Notification databases live in a cloud folder; this module defines the
//! shape the rest of the system consumes (find a folder, list database
//! files, download one) and ships a Google Drive implementation. All remote
//! I/O happens strictly before the resolver runs.

pub mod drive;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;
pub use drive::DriveClient;

/// Folder name the companion app uploads databases into
pub const DEFAULT_FOLDER: &str = "NotificationReboot";

/// Extension filter for listing database files
pub const DEFAULT_EXTENSION: &str = ".db";

/// Metadata for a remote database file
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// A place that stores database files remotely
#[async_trait]
pub trait RemoteSource {
    /// Find the identifier of a folder by name, if it exists
    async fn find_folder(&self, name: &str) -> Result<Option<String>>;

    /// List files in a folder whose names contain the extension filter
    async fn list_files(&self, folder_id: &str, extension: &str) -> Result<Vec<FileMetadata>>;

    /// Download a file's raw bytes
    async fn download(&self, file_id: &str) -> Result<Vec<u8>>;
}
