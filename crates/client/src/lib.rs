//! planhaus_client - data-sync client and CLI for the planhaus API.
//!
//! [`ApiClient`] talks to the server and recovers rejected sessions,
//! [`QueryCache`] deduplicates and caches reads, and [`Planner`] ties the
//! two together into per-resource hooks.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod output;
pub mod query;
pub mod resources;
pub mod session;
pub mod upload;
pub mod views;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::{ApiClient, AuthRecovery};
pub use query::{QueryCache, QueryOptions};
pub use resources::{Planner, QueryResult};
