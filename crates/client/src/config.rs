use std::{env, path::PathBuf, time::Duration};

use planhaus_core::sanitize::DEFAULT_MAX_UPLOAD_MB;

use crate::query::{QueryOptions, RetryPolicy};

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL (default: "http://localhost:5000")
    pub base_url: String,
    /// Where the session is persisted. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,
    /// Fall back to a demo login when a session expires (default: true)
    pub demo_fallback: bool,
    /// How long fetched data counts as fresh, in milliseconds (default: 0)
    pub stale_time_ms: u64,
    /// How long unobserved data stays cached, in milliseconds (default: 300,000)
    pub gc_time_ms: u64,
    /// Retries after a failed fetch (default: 2)
    pub retry: u32,
    /// First retry delay in milliseconds (default: 1,000)
    pub retry_base_delay_ms: u64,
    /// Retry delay ceiling in milliseconds (default: 30,000)
    pub retry_max_delay_ms: u64,
    /// Maximum number of cached queries (default: 1,000)
    pub cache_max_entries: usize,
    /// Largest file accepted for analysis, in megabytes (default: 10)
    pub upload_max_mb: u64,
    /// Search input debounce in milliseconds (default: 300)
    pub search_debounce_ms: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PLANHAUS_URL` - API base URL (default: "http://localhost:5000")
    /// - `PLANHAUS_SESSION_FILE` - Session file path (default: none)
    /// - `PLANHAUS_DEMO_FALLBACK` - Demo login on expiry (default: true)
    /// - `QUERY_STALE_TIME_MS` - Freshness window (default: 0)
    /// - `QUERY_GC_TIME_MS` - Unobserved entry lifetime (default: 300,000)
    /// - `QUERY_RETRY` - Fetch retries (default: 2)
    /// - `QUERY_RETRY_BASE_DELAY_MS` - First retry delay (default: 1,000)
    /// - `QUERY_RETRY_MAX_DELAY_MS` - Retry delay ceiling (default: 30,000)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached queries (default: 1,000)
    /// - `UPLOAD_MAX_MB` - Upload size limit (default: 10)
    /// - `SEARCH_DEBOUNCE_MS` - Search debounce (default: 300)
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("PLANHAUS_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            session_file: env::var("PLANHAUS_SESSION_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            demo_fallback: env::var("PLANHAUS_DEMO_FALLBACK")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            stale_time_ms: parse_env("QUERY_STALE_TIME_MS", 0),
            gc_time_ms: parse_env("QUERY_GC_TIME_MS", 300_000),
            retry: parse_env("QUERY_RETRY", 2),
            retry_base_delay_ms: parse_env("QUERY_RETRY_BASE_DELAY_MS", 1_000),
            retry_max_delay_ms: parse_env("QUERY_RETRY_MAX_DELAY_MS", 30_000),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", 1_000),
            upload_max_mb: parse_env("UPLOAD_MAX_MB", DEFAULT_MAX_UPLOAD_MB),
            search_debounce_ms: parse_env("SEARCH_DEBOUNCE_MS", 300),
        }
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_millis(self.stale_time_ms)
    }

    pub fn gc_time(&self) -> Duration {
        Duration::from_millis(self.gc_time_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Retry policy for query fetches.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retry,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
        }
    }

    /// Default options for every query.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            stale_time: self.stale_time(),
            gc_time: self.gc_time(),
            retry: self.retry_policy(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_retry_policy_conversion() {
        let config = ClientConfig {
            base_url: "http://localhost:5000".to_string(),
            session_file: None,
            demo_fallback: true,
            stale_time_ms: 0,
            gc_time_ms: 300_000,
            retry: 3,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 4_000,
            cache_max_entries: 1_000,
            upload_max_mb: 10,
            search_debounce_ms: 300,
        };

        let policy = config.retry_policy();
        assert_eq!(policy.retries, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(4));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        for name in [
            "PLANHAUS_URL",
            "PLANHAUS_SESSION_FILE",
            "PLANHAUS_DEMO_FALLBACK",
            "QUERY_STALE_TIME_MS",
            "QUERY_GC_TIME_MS",
            "QUERY_RETRY",
            "QUERY_RETRY_BASE_DELAY_MS",
            "QUERY_RETRY_MAX_DELAY_MS",
            "CACHE_MAX_ENTRIES",
            "UPLOAD_MAX_MB",
            "SEARCH_DEBOUNCE_MS",
        ] {
            env::remove_var(name);
        }

        let config = ClientConfig::from_env();

        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.session_file, None);
        assert!(config.demo_fallback);
        assert_eq!(config.stale_time(), Duration::ZERO);
        assert_eq!(config.gc_time(), Duration::from_secs(300));
        assert_eq!(config.retry, 2);
        assert_eq!(config.cache_max_entries, 1_000);
        assert_eq!(config.upload_max_mb, 10);
    }
}
