//! Timeline tasks of one project.

use std::sync::Arc;

use chrono::NaiveDate;
use planhaus_core::cache::{tasks_key, MutationTarget};
use planhaus_core::sanitize::sanitize_text;
use planhaus_core::tasks::{
    timeline_stats, validate_new_task, validate_task_patch, NewTask, Task, TaskPatch,
    TimelineStats,
};
use reqwest::Method;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{Planner, QueryResult};
use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct TasksResource {
    planner: Planner,
    project_id: Uuid,
}

impl TasksResource {
    pub(super) fn new(planner: Planner, project_id: Uuid) -> Self {
        Self {
            planner,
            project_id,
        }
    }

    /// List the project's tasks.
    pub async fn load(&self) -> Result<Arc<Vec<Task>>> {
        self.planner.read(tasks_key(self.project_id)).await
    }

    /// Like [`load`](Self::load), abandoned when `cancel` fires.
    pub async fn load_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<Task>>> {
        self.planner
            .read_with_cancel(tasks_key(self.project_id), cancel)
            .await
    }

    pub fn snapshot(&self) -> QueryResult<Vec<Task>> {
        self.planner.snapshot(&tasks_key(self.project_id))
    }

    pub fn prefetch(&self) -> JoinHandle<()> {
        self.planner.prefetch::<Vec<Task>>(tasks_key(self.project_id))
    }

    /// Progress figures as of `today`.
    pub async fn stats(&self, today: NaiveDate) -> Result<TimelineStats> {
        let tasks = self.load().await?;
        Ok(timeline_stats(&tasks, today))
    }

    /// Add a task.
    pub async fn create(&self, input: &NewTask) -> Result<Task> {
        let mut input = input.clone();
        input.title = sanitize_text(&input.title);
        input.description = input.description.as_deref().map(sanitize_text);
        validate_new_task(&input).map_err(|e| ClientError::validation(&e))?;

        let path = tasks_key(self.project_id).to_path();
        let send = self.planner.send_json(Method::POST, &path, &input);
        self.planner
            .mutate(MutationTarget::Task(self.project_id), send)
            .await
    }

    /// Update a task.
    pub async fn update(&self, task_id: Uuid, patch: &TaskPatch) -> Result<Task> {
        let mut patch = patch.clone();
        patch.title = patch.title.as_deref().map(sanitize_text);
        patch.description = patch.description.as_deref().map(sanitize_text);
        validate_task_patch(&patch).map_err(|e| ClientError::validation(&e))?;

        let path = task_path(task_id);
        let send = self.planner.send_json(Method::PATCH, &path, &patch);
        self.planner
            .mutate(MutationTarget::Task(self.project_id), send)
            .await
    }

    /// Flips a task between done and open, based on the cached list.
    pub async fn toggle(&self, task_id: Uuid) -> Result<Task> {
        let tasks = self.load().await?;
        let task = tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: format!("Task {} not found", task_id),
            })?;
        let patch = TaskPatch {
            completed: Some(!task.completed),
            ..Default::default()
        };
        self.update(task_id, &patch).await
    }

    /// Delete a task.
    pub async fn delete(&self, task_id: Uuid) -> Result<()> {
        let path = task_path(task_id);
        let send = self.planner.send_delete(&path);
        self.planner
            .mutate(MutationTarget::Task(self.project_id), send)
            .await
    }
}

fn task_path(task_id: Uuid) -> String {
    format!("/api/tasks/{}", task_id)
}
