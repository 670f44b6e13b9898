use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Root path segment for project-scoped resources.
pub const PROJECTS_ROOT: &str = "/api/projects";

/// Root path segment for the authenticated user.
pub const SESSION_USER_ROOT: &str = "/api/auth/user";

/// An ordered sequence of segments that names a cacheable request.
///
/// Equality is structural: two keys built from the same segments are the
/// same key regardless of where they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Creates a key with a single root segment.
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    /// Creates a key from an arbitrary list of segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Appends a segment, returning the extended key.
    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when every segment of `prefix` matches the leading
    /// segments of this key. Matching is per segment, so `["a", "b"]` is not
    /// a prefix of `["a", "bc"]`.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        prefix.0.len() <= self.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }

    /// Joins the segments into the request path the default fetcher uses.
    ///
    /// ```
    /// use planhaus_core::cache::QueryKey;
    ///
    /// let key = QueryKey::new("/api/projects").with("p1").with("budget");
    /// assert_eq!(key.to_path(), "/api/projects/p1/budget");
    /// ```
    pub fn to_path(&self) -> String {
        self.0.join("/")
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Returns the key for the authenticated user.
pub fn session_user_key() -> QueryKey {
    QueryKey::new(SESSION_USER_ROOT)
}

/// Returns the key for the list of projects visible to the session.
pub fn projects_key() -> QueryKey {
    QueryKey::new(PROJECTS_ROOT)
}

/// Returns the key for a single project. Every project-scoped key starts
/// with this one.
pub fn project_key(project_id: Uuid) -> QueryKey {
    projects_key().with(project_id)
}

/// Returns the key for a project's budget items.
pub fn budget_key(project_id: Uuid) -> QueryKey {
    project_key(project_id).with("budget")
}

/// Returns the key for a project's budget categories.
pub fn budget_categories_key(project_id: Uuid) -> QueryKey {
    project_key(project_id).with("budget-categories")
}

/// Returns the key for a project's vendors.
pub fn vendors_key(project_id: Uuid) -> QueryKey {
    project_key(project_id).with("vendors")
}

/// Returns the key for a project's guest list.
pub fn guests_key(project_id: Uuid) -> QueryKey {
    project_key(project_id).with("guests")
}

/// Returns the key for a project's timeline tasks.
pub fn tasks_key(project_id: Uuid) -> QueryKey {
    project_key(project_id).with("tasks")
}

/// Returns the key for a project's dashboard statistics.
pub fn dashboard_key(project_id: Uuid) -> QueryKey {
    project_key(project_id).with("dashboard")
}
