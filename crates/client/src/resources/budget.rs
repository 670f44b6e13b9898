//! Budget items and categories of one project.

use std::sync::Arc;

use planhaus_core::budget::{
    items_for_category, summarize_budget, validate_budget_patch, validate_new_budget_item,
    validate_new_category, BudgetCategory, BudgetItem, BudgetItemPatch, BudgetSummary,
    NewBudgetCategory, NewBudgetItem,
};
use planhaus_core::cache::{budget_categories_key, budget_key, MutationTarget};
use planhaus_core::sanitize::sanitize_text;
use reqwest::Method;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{Planner, QueryResult};
use crate::error::{ClientError, Result};

/// Everything the budget view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetOverview {
    pub items: Arc<Vec<BudgetItem>>,
    pub categories: Arc<Vec<BudgetCategory>>,
    pub summary: BudgetSummary,
}

impl BudgetOverview {
    /// Items of one category, matched exactly first and case-insensitively
    /// when nothing matches exactly.
    pub fn items_in(&self, category: &str) -> Vec<&BudgetItem> {
        items_for_category(&self.items, category)
    }
}

/// Budget of one project.
#[derive(Debug, Clone)]
pub struct BudgetResource {
    planner: Planner,
    project_id: Uuid,
}

impl BudgetResource {
    pub(super) fn new(planner: Planner, project_id: Uuid) -> Self {
        Self {
            planner,
            project_id,
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// List the project's budget items.
    pub async fn load(&self) -> Result<Arc<Vec<BudgetItem>>> {
        self.planner.read(budget_key(self.project_id)).await
    }

    /// Like [`load`](Self::load), abandoned when `cancel` fires.
    pub async fn load_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<BudgetItem>>> {
        self.planner
            .read_with_cancel(budget_key(self.project_id), cancel)
            .await
    }

    pub fn snapshot(&self) -> QueryResult<Vec<BudgetItem>> {
        self.planner.snapshot(&budget_key(self.project_id))
    }

    pub fn prefetch(&self) -> JoinHandle<()> {
        self.planner.prefetch::<Vec<BudgetItem>>(budget_key(self.project_id))
    }

    /// List the project's budget categories.
    pub async fn categories(&self) -> Result<Arc<Vec<BudgetCategory>>> {
        self.planner
            .read(budget_categories_key(self.project_id))
            .await
    }

    pub fn categories_snapshot(&self) -> QueryResult<Vec<BudgetCategory>> {
        self.planner
            .snapshot(&budget_categories_key(self.project_id))
    }

    /// Loads items and categories together and summarizes them against the
    /// project's total budget.
    pub async fn overview(&self, total_budget: Option<f64>) -> Result<BudgetOverview> {
        let (items, categories) = tokio::try_join!(self.load(), self.categories())?;
        let summary = summarize_budget(total_budget, &categories, &items);
        Ok(BudgetOverview {
            items,
            categories,
            summary,
        })
    }

    /// Add a budget item.
    pub async fn create(&self, input: &NewBudgetItem) -> Result<BudgetItem> {
        let mut input = input.clone();
        input.category = sanitize_text(&input.category);
        input.description = sanitize_text(&input.description);
        input.vendor = input.vendor.as_deref().map(sanitize_text);
        validate_new_budget_item(&input).map_err(|e| ClientError::validation(&e))?;

        let path = budget_key(self.project_id).to_path();
        let send = self.planner.send_json(Method::POST, &path, &input);
        self.planner
            .mutate(MutationTarget::Budget(self.project_id), send)
            .await
    }

    /// Update a budget item.
    pub async fn update(&self, item_id: Uuid, patch: &BudgetItemPatch) -> Result<BudgetItem> {
        let mut patch = patch.clone();
        patch.category = patch.category.as_deref().map(sanitize_text);
        patch.description = patch.description.as_deref().map(sanitize_text);
        validate_budget_patch(&patch).map_err(|e| ClientError::validation(&e))?;

        let path = item_path(item_id);
        let send = self.planner.send_json(Method::PATCH, &path, &patch);
        self.planner
            .mutate(MutationTarget::Budget(self.project_id), send)
            .await
    }

    /// Delete a budget item.
    pub async fn delete(&self, item_id: Uuid) -> Result<()> {
        let path = item_path(item_id);
        let send = self.planner.send_delete(&path);
        self.planner
            .mutate(MutationTarget::Budget(self.project_id), send)
            .await
    }

    /// Add a budget category.
    pub async fn create_category(&self, input: &NewBudgetCategory) -> Result<BudgetCategory> {
        let mut input = input.clone();
        input.name = sanitize_text(&input.name);
        validate_new_category(&input).map_err(|e| ClientError::validation(&e))?;

        let path = budget_categories_key(self.project_id).to_path();
        let send = self.planner.send_json(Method::POST, &path, &input);
        self.planner
            .mutate(MutationTarget::BudgetCategory(self.project_id), send)
            .await
    }

    /// Delete a budget category.
    pub async fn delete_category(&self, category_id: Uuid) -> Result<()> {
        let path = format!("/api/budget-categories/{}", category_id);
        let send = self.planner.send_delete(&path);
        self.planner
            .mutate(MutationTarget::BudgetCategory(self.project_id), send)
            .await
    }
}

fn item_path(item_id: Uuid) -> String {
    format!("/api/budget/{}", item_id)
}
