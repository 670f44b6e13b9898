use chrono::NaiveDate;

use super::error::ProjectError;
use super::types::{DashboardStats, NewProject, Project, ProjectPatch};
use crate::budget::BudgetItem;
use crate::guests::{Guest, RsvpStatus};
use crate::tasks::Task;
use crate::validation::{check_amount, is_blank, too_long, MAX_TEXT_LEN};
use crate::vendors::Vendor;

/// Whole days from `today` until the wedding; negative once it has passed.
pub fn days_until(wedding_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    wedding_date.map(|d| (d - today).num_days())
}

/// Computes dashboard figures locally from cached resource lists, so the
/// dashboard can render from whatever is already cached.
pub fn compute_dashboard(
    project: &Project,
    budget: &[BudgetItem],
    guests: &[Guest],
    tasks: &[Task],
    vendors: &[Vendor],
    today: NaiveDate,
) -> DashboardStats {
    DashboardStats {
        total_budget: crate::format::finite_or_zero(project.total_budget),
        total_spent: budget.iter().map(BudgetItem::spent).sum(),
        total_guests: guests.len(),
        confirmed_guests: guests
            .iter()
            .filter(|g| g.rsvp_status == RsvpStatus::Attending)
            .count(),
        total_tasks: tasks.len(),
        completed_tasks: tasks.iter().filter(|t| t.completed).count(),
        total_vendors: vendors.len(),
        booked_vendors: vendors.iter().filter(|v| v.booked()).count(),
        days_until_wedding: days_until(project.wedding_date, today),
    }
}

/// Validates a project before creation.
pub fn validate_new_project(project: &NewProject) -> Result<(), ProjectError> {
    if is_blank(&project.name) {
        return Err(ProjectError::EmptyName);
    }
    if too_long(&project.name, MAX_TEXT_LEN) {
        return Err(ProjectError::NameTooLong);
    }
    if let Some(budget) = project.total_budget {
        check_amount(budget).map_err(|_| ProjectError::InvalidBudget)?;
    }
    Ok(())
}

/// Validates the fields present in a partial update.
pub fn validate_project_patch(patch: &ProjectPatch) -> Result<(), ProjectError> {
    if let Some(name) = &patch.name {
        if is_blank(name) {
            return Err(ProjectError::EmptyName);
        }
        if too_long(name, MAX_TEXT_LEN) {
            return Err(ProjectError::NameTooLong);
        }
    }
    if let Some(budget) = patch.total_budget {
        check_amount(budget).map_err(|_| ProjectError::InvalidBudget)?;
    }
    Ok(())
}
