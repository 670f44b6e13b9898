//! Dashboard figures of one project.

use std::sync::Arc;

use chrono::NaiveDate;
use planhaus_core::cache::dashboard_key;
use planhaus_core::projects::{compute_dashboard, DashboardStats};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{Planner, QueryResult};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct DashboardResource {
    planner: Planner,
    project_id: Uuid,
}

impl DashboardResource {
    pub(super) fn new(planner: Planner, project_id: Uuid) -> Self {
        Self {
            planner,
            project_id,
        }
    }

    /// Server-computed dashboard statistics.
    pub async fn load(&self) -> Result<Arc<DashboardStats>> {
        self.planner.read(dashboard_key(self.project_id)).await
    }

    /// Like [`load`](Self::load), abandoned when `cancel` fires.
    pub async fn load_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<DashboardStats>> {
        self.planner
            .read_with_cancel(dashboard_key(self.project_id), cancel)
            .await
    }

    pub fn snapshot(&self) -> QueryResult<DashboardStats> {
        self.planner.snapshot(&dashboard_key(self.project_id))
    }

    pub fn prefetch(&self) -> JoinHandle<()> {
        self.planner.prefetch::<DashboardStats>(dashboard_key(self.project_id))
    }

    /// Derives the statistics from the project's resource lists, loading
    /// them concurrently (and sharing fetches already running).
    pub async fn compute(&self, today: NaiveDate) -> Result<DashboardStats> {
        let id = self.project_id;
        let projects = self.planner.projects();
        let budget = self.planner.budget(id);
        let guests = self.planner.guests(id);
        let tasks = self.planner.tasks(id);
        let vendors = self.planner.vendors(id);
        let (project, budget, guests, tasks, vendors) = tokio::try_join!(
            projects.get(id),
            budget.load(),
            guests.load(),
            tasks.load(),
            vendors.load(),
        )?;
        Ok(compute_dashboard(
            &project, &budget, &guests, &tasks, &vendors, today,
        ))
    }
}
