//! Vendors of one project.

use std::sync::Arc;

use planhaus_core::cache::{vendors_key, MutationTarget};
use planhaus_core::sanitize::sanitize_text;
use planhaus_core::vendors::{
    arrange_vendors, validate_new_vendor, validate_vendor_patch, NewVendor, SortDirection,
    Vendor, VendorFilter, VendorPatch, VendorSortKey,
};
use reqwest::Method;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{Planner, QueryResult};
use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct VendorsResource {
    planner: Planner,
    project_id: Uuid,
}

impl VendorsResource {
    pub(super) fn new(planner: Planner, project_id: Uuid) -> Self {
        Self {
            planner,
            project_id,
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// List the project's vendors in server order.
    pub async fn load(&self) -> Result<Arc<Vec<Vendor>>> {
        self.planner.read(vendors_key(self.project_id)).await
    }

    /// Like [`load`](Self::load), abandoned when `cancel` fires.
    pub async fn load_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<Vendor>>> {
        self.planner
            .read_with_cancel(vendors_key(self.project_id), cancel)
            .await
    }

    pub fn snapshot(&self) -> QueryResult<Vec<Vendor>> {
        self.planner.snapshot(&vendors_key(self.project_id))
    }

    pub fn prefetch(&self) -> JoinHandle<()> {
        self.planner.prefetch::<Vec<Vendor>>(vendors_key(self.project_id))
    }

    /// Loads the vendors, then filters and sorts them for display.
    pub async fn arranged(
        &self,
        filter: &VendorFilter,
        key: VendorSortKey,
        direction: SortDirection,
    ) -> Result<Vec<Vendor>> {
        let vendors = self.load().await?;
        Ok(arrange_vendors(&vendors, filter, key, direction))
    }

    /// Add a vendor.
    pub async fn create(&self, input: &NewVendor) -> Result<Vendor> {
        let mut input = input.clone();
        input.name = sanitize_text(&input.name);
        input.category = sanitize_text(&input.category);
        input.contact_name = input.contact_name.as_deref().map(sanitize_text);
        validate_new_vendor(&input).map_err(|e| ClientError::validation(&e))?;

        let path = vendors_key(self.project_id).to_path();
        let send = self.planner.send_json(Method::POST, &path, &input);
        self.planner
            .mutate(MutationTarget::Vendor(self.project_id), send)
            .await
    }

    /// Update a vendor.
    pub async fn update(&self, vendor_id: Uuid, patch: &VendorPatch) -> Result<Vendor> {
        let mut patch = patch.clone();
        patch.name = patch.name.as_deref().map(sanitize_text);
        patch.category = patch.category.as_deref().map(sanitize_text);
        validate_vendor_patch(&patch).map_err(|e| ClientError::validation(&e))?;

        let path = vendor_path(vendor_id);
        let send = self.planner.send_json(Method::PATCH, &path, &patch);
        self.planner
            .mutate(MutationTarget::Vendor(self.project_id), send)
            .await
    }

    /// Delete a vendor.
    pub async fn delete(&self, vendor_id: Uuid) -> Result<()> {
        let path = vendor_path(vendor_id);
        let send = self.planner.send_delete(&path);
        self.planner
            .mutate(MutationTarget::Vendor(self.project_id), send)
            .await
    }
}

fn vendor_path(vendor_id: Uuid) -> String {
    format!("/api/vendors/{}", vendor_id)
}
