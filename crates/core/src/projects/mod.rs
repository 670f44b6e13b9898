mod error;
mod operations;
mod types;

pub use error::ProjectError;
pub use operations::{compute_dashboard, days_until, validate_new_project, validate_project_patch};
pub use types::{DashboardStats, NewProject, Project, ProjectPatch};
