//! Invalidation sets declared by each kind of mutation.
//!
//! Every write refreshes the list it touched plus the project's dashboard,
//! since the dashboard summarizes budget, guests, vendors and tasks.

use uuid::Uuid;

use super::keys::{
    budget_categories_key, budget_key, dashboard_key, guests_key, project_key, projects_key,
    tasks_key, vendors_key,
};
use super::QueryFilter;

/// The resource a mutation writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget {
    /// A project was created (`None`) or changed/deleted (`Some`).
    Project(Option<Uuid>),
    /// A budget item of the project.
    Budget(Uuid),
    /// A budget category of the project.
    BudgetCategory(Uuid),
    /// A vendor of the project.
    Vendor(Uuid),
    /// A guest of the project.
    Guest(Uuid),
    /// A timeline task of the project.
    Task(Uuid),
}

/// Returns the filters whose entries must be refetched after a successful
/// mutation against `target`.
pub fn invalidation_for(target: MutationTarget) -> Vec<QueryFilter> {
    match target {
        MutationTarget::Project(None) => vec![QueryFilter::exact(projects_key())],
        MutationTarget::Project(Some(id)) => vec![
            QueryFilter::exact(projects_key()),
            QueryFilter::prefix(project_key(id)),
        ],
        MutationTarget::Budget(id) | MutationTarget::BudgetCategory(id) => vec![
            QueryFilter::exact(budget_key(id)),
            QueryFilter::exact(budget_categories_key(id)),
            QueryFilter::exact(dashboard_key(id)),
        ],
        MutationTarget::Vendor(id) => vec![
            QueryFilter::exact(vendors_key(id)),
            QueryFilter::exact(dashboard_key(id)),
        ],
        MutationTarget::Guest(id) => vec![
            QueryFilter::exact(guests_key(id)),
            QueryFilter::exact(dashboard_key(id)),
        ],
        MutationTarget::Task(id) => vec![
            QueryFilter::exact(tasks_key(id)),
            QueryFilter::exact(dashboard_key(id)),
        ],
    }
}
