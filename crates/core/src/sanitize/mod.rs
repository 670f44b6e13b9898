//! Cleaning of user-supplied strings and files before they reach the
//! network layer.

mod text;
mod upload;

pub use text::{escape_html, sanitize_filename, sanitize_text, MAX_FILENAME_LEN};
pub use upload::{
    mime_for_extension, resolve_mime, validate_upload, FileMeta, UploadError,
    ALLOWED_MIME_TYPES, DEFAULT_MAX_UPLOAD_MB, MIME_CSV, MIME_PDF, MIME_XLS, MIME_XLSX,
};
