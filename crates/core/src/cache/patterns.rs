//! Pure matching functions for query keys.
//!
//! A filter either names one key exactly or names a prefix that covers every
//! key nested under it.

use serde::{Deserialize, Serialize};

use super::QueryKey;

/// Selects cached entries by key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryFilter {
    pub key: QueryKey,
    /// When false, every key that starts with `key` matches too.
    pub exact: bool,
}

impl QueryFilter {
    /// Matches only `key` itself.
    pub fn exact(key: QueryKey) -> Self {
        Self { key, exact: true }
    }

    /// Matches `key` and every key nested under it.
    pub fn prefix(key: QueryKey) -> Self {
        Self { key, exact: false }
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        filter_matches(self, key)
    }
}

impl From<QueryKey> for QueryFilter {
    fn from(key: QueryKey) -> Self {
        Self::prefix(key)
    }
}

/// Checks whether a cached key is selected by a filter.
///
/// # Examples
///
/// ```
/// use planhaus_core::cache::{filter_matches, QueryFilter, QueryKey};
///
/// let project = QueryKey::from_segments(["/api/projects", "p1"]);
/// let budget = project.clone().with("budget");
///
/// assert!(filter_matches(&QueryFilter::prefix(project.clone()), &budget));
/// assert!(!filter_matches(&QueryFilter::exact(project), &budget));
/// ```
pub fn filter_matches(filter: &QueryFilter, key: &QueryKey) -> bool {
    if filter.exact {
        filter.key == *key
    } else {
        key.starts_with(&filter.key)
    }
}

/// Checks whether any filter in the set selects the key.
pub fn any_filter_matches(filters: &[QueryFilter], key: &QueryKey) -> bool {
    filters.iter().any(|f| filter_matches(f, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(segments: &[&str]) -> QueryKey {
        QueryKey::from_segments(segments.iter().copied())
    }

    #[test]
    fn test_exact_match() {
        let filter = QueryFilter::exact(key(&["/api/projects", "1", "budget"]));
        assert!(filter.matches(&key(&["/api/projects", "1", "budget"])));
        assert!(!filter.matches(&key(&["/api/projects", "1"])));
        assert!(!filter.matches(&key(&["/api/projects", "1", "budget", "x"])));
    }

    #[test]
    fn test_prefix_match_nested() {
        let filter = QueryFilter::prefix(key(&["/api/projects", "1"]));
        assert!(filter.matches(&key(&["/api/projects", "1"])));
        assert!(filter.matches(&key(&["/api/projects", "1", "budget"])));
        assert!(filter.matches(&key(&["/api/projects", "1", "vendors"])));
    }

    #[test]
    fn test_prefix_does_not_match_sibling() {
        let filter = QueryFilter::prefix(key(&["/api/projects", "1"]));
        assert!(!filter.matches(&key(&["/api/projects", "2", "budget"])));
        assert!(!filter.matches(&key(&["/api/projects", "10"])));
        assert!(!filter.matches(&key(&["/api/projects"])));
    }

    #[test]
    fn test_root_prefix_matches_everything_below() {
        let filter = QueryFilter::prefix(key(&["/api/projects"]));
        assert!(filter.matches(&key(&["/api/projects"])));
        assert!(filter.matches(&key(&["/api/projects", "9", "tasks"])));
        assert!(!filter.matches(&key(&["/api/auth/user"])));
    }

    #[test]
    fn test_from_key_is_prefix() {
        let filter: QueryFilter = key(&["a"]).into();
        assert!(!filter.exact);
    }

    #[test]
    fn test_any_filter_matches() {
        let filters = vec![
            QueryFilter::exact(key(&["a", "b"])),
            QueryFilter::prefix(key(&["c"])),
        ];
        assert!(any_filter_matches(&filters, &key(&["a", "b"])));
        assert!(any_filter_matches(&filters, &key(&["c", "d"])));
        assert!(!any_filter_matches(&filters, &key(&["a", "b", "c"])));
        assert!(!any_filter_matches(&[], &key(&["a"])));
    }
}
