mod invalidation;
mod keys;
mod patterns;

pub use invalidation::{invalidation_for, MutationTarget};
pub use keys::{
    budget_categories_key, budget_key, dashboard_key, guests_key, project_key, projects_key,
    session_user_key, tasks_key, vendors_key, QueryKey, PROJECTS_ROOT, SESSION_USER_ROOT,
};
pub use patterns::{any_filter_matches, filter_matches, QueryFilter};
