//! Project list and project CRUD.

use std::sync::Arc;

use planhaus_core::cache::{project_key, projects_key, MutationTarget, PROJECTS_ROOT};
use planhaus_core::projects::{
    validate_new_project, validate_project_patch, NewProject, Project, ProjectPatch,
};
use planhaus_core::sanitize::sanitize_text;
use reqwest::Method;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{Planner, QueryResult};
use crate::error::{ClientError, Result};

/// Projects visible to the session.
#[derive(Debug, Clone)]
pub struct ProjectsResource {
    planner: Planner,
}

impl ProjectsResource {
    pub(super) fn new(planner: Planner) -> Self {
        Self { planner }
    }

    /// List all projects.
    pub async fn load(&self) -> Result<Arc<Vec<Project>>> {
        self.planner.read(projects_key()).await
    }

    /// Like [`load`](Self::load), abandoned when `cancel` fires.
    pub async fn load_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<Project>>> {
        self.planner
            .read_with_cancel(projects_key(), cancel)
            .await
    }

    pub fn snapshot(&self) -> QueryResult<Vec<Project>> {
        self.planner.snapshot(&projects_key())
    }

    pub fn prefetch(&self) -> JoinHandle<()> {
        self.planner.prefetch::<Vec<Project>>(projects_key())
    }

    /// Get project by ID.
    pub async fn get(&self, id: Uuid) -> Result<Arc<Project>> {
        self.planner.read(project_key(id)).await
    }

    pub async fn get_with_cancel(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Arc<Project>> {
        self.planner.read_with_cancel(project_key(id), cancel).await
    }

    /// Create a new project.
    pub async fn create(&self, input: &NewProject) -> Result<Project> {
        let mut input = input.clone();
        input.name = sanitize_text(&input.name);
        input.location = input.location.as_deref().map(sanitize_text);
        validate_new_project(&input).map_err(|e| ClientError::validation(&e))?;

        let send = self.planner.send_json(Method::POST, PROJECTS_ROOT, &input);
        self.planner.mutate(MutationTarget::Project(None), send).await
    }

    /// Update a project.
    pub async fn update(&self, id: Uuid, patch: &ProjectPatch) -> Result<Project> {
        let mut patch = patch.clone();
        patch.name = patch.name.as_deref().map(sanitize_text);
        validate_project_patch(&patch).map_err(|e| ClientError::validation(&e))?;

        let path = project_key(id).to_path();
        let send = self.planner.send_json(Method::PATCH, &path, &patch);
        self.planner.mutate(MutationTarget::Project(Some(id)), send).await
    }

    /// Delete project by ID, together with everything cached under it.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let path = project_key(id).to_path();
        let send = self.planner.send_delete(&path);
        self.planner.mutate(MutationTarget::Project(Some(id)), send).await
    }
}
