use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::{deserialize_amount, deserialize_optional_amount, deserialize_optional_string};

/// A single planned or incurred expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Free-text category name. Casing is not guaranteed to match the
    /// project's category definitions.
    pub category: String,
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub estimated_cost: f64,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub actual_cost: Option<f64>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub vendor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub notes: Option<String>,
}

impl BudgetItem {
    /// Creates an item with an estimate and no actual cost.
    pub fn new(
        project_id: Uuid,
        category: impl Into<String>,
        description: impl Into<String>,
        estimated_cost: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            category: category.into(),
            description: description.into(),
            estimated_cost,
            actual_cost: None,
            is_paid: false,
            vendor: None,
            notes: None,
        }
    }

    /// Sets the actual cost.
    pub fn with_actual(mut self, actual: f64) -> Self {
        self.actual_cost = Some(actual);
        self
    }

    /// Marks the item as paid.
    pub fn paid(mut self) -> Self {
        self.is_paid = true;
        self
    }

    /// Amount counted as spent: the actual cost, or zero when none is
    /// recorded yet.
    pub fn spent(&self) -> f64 {
        crate::format::finite_or_zero(self.actual_cost)
    }
}

/// A project's allocation for one spending category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub allocated_amount: f64,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub color: Option<String>,
}

impl BudgetCategory {
    pub fn new(project_id: Uuid, name: impl Into<String>, allocated_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: name.into(),
            allocated_amount,
            color: None,
        }
    }
}

/// Request body for creating a budget item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetItem {
    pub category: String,
    pub description: String,
    pub estimated_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for a partial budget item update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for creating a budget category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetCategory {
    pub name: String,
    pub allocated_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
