use thiserror::Error;

use crate::validation::FieldError;

/// Default maximum upload size in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 10;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_CSV: &str = "text/csv";

/// MIME types accepted by the document analysis endpoint.
pub const ALLOWED_MIME_TYPES: [&str; 4] = [MIME_PDF, MIME_XLSX, MIME_XLS, MIME_CSV];

/// What the client knows about a file before sending it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    /// Declared MIME type, if the source provided one.
    pub mime: Option<String>,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime: Option<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime,
            size,
        }
    }
}

/// Errors that reject a file before upload.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UploadError {
    #[error("Unsupported file type: {0}. Upload a PDF, Excel or CSV file")]
    UnsupportedType(String),
    #[error("File is too large ({size_mb:.1} MB). Maximum is {max_mb} MB")]
    TooLarge { size_mb: f64, max_mb: u64 },
    #[error("File is empty")]
    Empty,
}

impl FieldError for UploadError {
    fn field(&self) -> &'static str {
        "file"
    }
}

/// Maps a file name's extension to an accepted MIME type.
pub fn mime_for_extension(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(MIME_PDF),
        "xlsx" => Some(MIME_XLSX),
        "xls" => Some(MIME_XLS),
        "csv" => Some(MIME_CSV),
        _ => None,
    }
}

/// Resolves the MIME type to send: the declared type when it is specific,
/// otherwise the one implied by the extension.
pub fn resolve_mime(file: &FileMeta) -> Option<String> {
    match file.mime.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() && m != "application/octet-stream" => {
            Some(m.to_ascii_lowercase())
        }
        _ => mime_for_extension(&file.name).map(str::to_string),
    }
}

/// Checks type and size limits before a file is sent for analysis.
pub fn validate_upload(file: &FileMeta, max_mb: u64) -> Result<String, UploadError> {
    let mime = resolve_mime(file)
        .ok_or_else(|| UploadError::UnsupportedType(file.name.clone()))?;
    // Browsers report CSV under several names.
    let mime = match mime.as_str() {
        "application/csv" | "text/comma-separated-values" => MIME_CSV.to_string(),
        _ => mime,
    };
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(UploadError::UnsupportedType(mime));
    }
    if file.size == 0 {
        return Err(UploadError::Empty);
    }
    let max_bytes = max_mb.saturating_mul(1024 * 1024);
    if file.size > max_bytes {
        return Err(UploadError::TooLarge {
            size_mb: file.size as f64 / (1024.0 * 1024.0),
            max_mb,
        });
    }
    Ok(mime)
}
