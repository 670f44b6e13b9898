//! Document analysis uploads.

use std::path::Path;

use planhaus_core::sanitize::{sanitize_filename, validate_upload, FileMeta};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::Result;
use crate::http::{ApiClient, FilePart, RequestBody};

pub const ANALYZE_PATH: &str = "/api/documents/analyze";

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Result of analyzing an uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub analysis: String,
}

impl ApiClient {
    /// Sends a document for analysis.
    ///
    /// The file is checked against the accepted types and `max_mb` before
    /// anything is sent. Cancelling `cancel` drops the upload and fails with
    /// [`ClientError::Cancelled`](crate::ClientError::Cancelled).
    pub async fn analyze_document(
        &self,
        name: &str,
        mime: Option<String>,
        bytes: Vec<u8>,
        max_mb: u64,
        cancel: Option<&CancellationToken>,
    ) -> Result<DocumentAnalysis> {
        let meta = FileMeta::new(name, mime, bytes.len() as u64);
        let mime = validate_upload(&meta, max_mb)?;
        let file_name = sanitize_filename(name);
        info!(file = %file_name, %mime, size = meta.size, "Uploading document for analysis");

        let part = FilePart::new(FILE_FIELD, file_name, mime, bytes);
        self.request(Method::POST, ANALYZE_PATH, RequestBody::Multipart(part), cancel)
            .await
    }

    /// Reads `path` and sends it for analysis, typing it by extension.
    pub async fn analyze_file(
        &self,
        path: &Path,
        max_mb: u64,
        cancel: Option<&CancellationToken>,
    ) -> Result<DocumentAnalysis> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.analyze_document(&name, None, bytes, max_mb, cancel)
            .await
    }
}
