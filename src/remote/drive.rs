//! Google Drive implementation of the remote file source

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{FileMetadata, RemoteSource};
use crate::Result;

const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";

/// Drive v3 client authenticated with a bearer token.
///
/// Obtaining the token (OAuth flow, refresh) is the caller's problem; the
/// client only attaches it to requests.
pub struct DriveClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl DriveClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            base_url: DRIVE_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (for testing)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_file_list(&self, query: &str, fields: Option<&str>) -> Result<FileList> {
        let mut request = self
            .http
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&self.token)
            .query(&[("q", query)]);
        if let Some(fields) = fields {
            request = request.query(&[("fields", fields)]);
        }

        let list = request
            .send()
            .await?
            .error_for_status()?
            .json::<FileList>()
            .await?;
        Ok(list)
    }
}

#[async_trait]
impl RemoteSource for DriveClient {
    async fn find_folder(&self, name: &str) -> Result<Option<String>> {
        let query = format!(
            "name='{}' and mimeType='application/vnd.google-apps.folder' and trashed=false",
            escape_query_value(name)
        );
        let list = self.get_file_list(&query, None).await?;
        Ok(list.files.unwrap_or_default().into_iter().next().map(|f| f.id))
    }

    async fn list_files(&self, folder_id: &str, extension: &str) -> Result<Vec<FileMetadata>> {
        let query = format!(
            "'{}' in parents and name contains '{}' and trashed=false",
            escape_query_value(folder_id),
            escape_query_value(extension)
        );
        let list = self
            .get_file_list(&query, Some("files(id,name,size,modifiedTime)"))
            .await?;
        Ok(list
            .files
            .unwrap_or_default()
            .into_iter()
            .map(FileMetadata::from)
            .collect())
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&self.token)
            .query(&[("alt", "media")])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

/// Escape single quotes and backslashes inside a Drive query literal
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[derive(Debug, Deserialize)]
struct FileList {
    files: Option<Vec<DriveFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    // Drive reports sizes as decimal strings
    size: Option<String>,
    modified_time: Option<String>,
}

impl From<DriveFile> for FileMetadata {
    fn from(file: DriveFile) -> Self {
        let size = file
            .size
            .as_deref()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        let modified = file
            .modified_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            id: file.id,
            name: file.name,
            size,
            modified,
        }
    }
}
