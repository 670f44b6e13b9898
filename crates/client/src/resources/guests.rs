//! Guest list of one project.

use std::sync::Arc;

use planhaus_core::cache::{guests_key, MutationTarget};
use planhaus_core::guests::{
    guest_stats, validate_guest_patch, validate_new_guest, Guest, GuestPatch, GuestStats,
    NewGuest, RsvpStatus,
};
use planhaus_core::sanitize::sanitize_text;
use reqwest::Method;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{Planner, QueryResult};
use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct GuestsResource {
    planner: Planner,
    project_id: Uuid,
}

impl GuestsResource {
    pub(super) fn new(planner: Planner, project_id: Uuid) -> Self {
        Self {
            planner,
            project_id,
        }
    }

    /// List the project's guests.
    pub async fn load(&self) -> Result<Arc<Vec<Guest>>> {
        self.planner.read(guests_key(self.project_id)).await
    }

    /// Like [`load`](Self::load), abandoned when `cancel` fires.
    pub async fn load_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<Guest>>> {
        self.planner
            .read_with_cancel(guests_key(self.project_id), cancel)
            .await
    }

    pub fn snapshot(&self) -> QueryResult<Vec<Guest>> {
        self.planner.snapshot(&guests_key(self.project_id))
    }

    pub fn prefetch(&self) -> JoinHandle<()> {
        self.planner.prefetch::<Vec<Guest>>(guests_key(self.project_id))
    }

    /// RSVP counts and headcount.
    pub async fn stats(&self) -> Result<GuestStats> {
        let guests = self.load().await?;
        Ok(guest_stats(&guests))
    }

    /// Add a guest.
    pub async fn create(&self, input: &NewGuest) -> Result<Guest> {
        let mut input = input.clone();
        input.name = sanitize_text(&input.name);
        input.email = input.email.as_deref().map(str::trim).map(str::to_string);
        validate_new_guest(&input).map_err(|e| ClientError::validation(&e))?;

        let path = guests_key(self.project_id).to_path();
        let send = self.planner.send_json(Method::POST, &path, &input);
        self.planner
            .mutate(MutationTarget::Guest(self.project_id), send)
            .await
    }

    /// Update a guest.
    pub async fn update(&self, guest_id: Uuid, patch: &GuestPatch) -> Result<Guest> {
        let mut patch = patch.clone();
        patch.name = patch.name.as_deref().map(sanitize_text);
        validate_guest_patch(&patch).map_err(|e| ClientError::validation(&e))?;

        let path = guest_path(guest_id);
        let send = self.planner.send_json(Method::PATCH, &path, &patch);
        self.planner
            .mutate(MutationTarget::Guest(self.project_id), send)
            .await
    }

    /// Record a guest's answer.
    pub async fn set_rsvp(&self, guest_id: Uuid, status: RsvpStatus) -> Result<Guest> {
        let patch = GuestPatch {
            rsvp_status: Some(status),
            ..Default::default()
        };
        self.update(guest_id, &patch).await
    }

    /// Delete a guest.
    pub async fn delete(&self, guest_id: Uuid) -> Result<()> {
        let path = guest_path(guest_id);
        let send = self.planner.send_delete(&path);
        self.planner
            .mutate(MutationTarget::Guest(self.project_id), send)
            .await
    }
}

fn guest_path(guest_id: Uuid) -> String {
    format!("/api/guests/{}", guest_id)
}
