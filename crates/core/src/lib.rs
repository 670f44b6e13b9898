//! planhaus_core - functional core of the planhaus client.
//!
//! Everything here is pure: query keys and invalidation sets, domain types
//! with lenient decoding, derived-view aggregation, formatting, sanitization
//! and form validation. I/O lives in `planhaus_client`.

pub mod auth;
pub mod budget;
pub mod cache;
pub mod format;
pub mod guests;
pub mod projects;
pub mod sanitize;
pub mod serde;
pub mod tasks;
pub mod validation;
pub mod vendors;
