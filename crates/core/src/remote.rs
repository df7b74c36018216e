//! Seams between the interaction flow and the hosted service.
//!
//! [`crate::client::GeminiClient`] implements both traits over HTTP. Tests
//! substitute in-memory fakes.

use std::{path::Path, time::Duration};

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Part, RemoteFile},
};

/// Remote file storage: list, get-by-name, upload and delete.
#[async_trait]
pub trait FileService: Send + Sync {
    async fn list_files(&self) -> Result<Vec<RemoteFile>>;

    async fn get_file(&self, name: &str) -> Result<RemoteFile>;

    async fn upload_file(&self, path: &Path, display_name: &str, mime_type: &str)
    -> Result<RemoteFile>;

    async fn delete_file(&self, name: &str) -> Result<()>;
}

/// A hosted model that turns an ordered list of parts into text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(&self, parts: &[Part], timeout: Duration) -> Result<String>;
}
