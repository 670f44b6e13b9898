use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::{
    deserialize_amount, deserialize_optional_amount, deserialize_optional_date,
    deserialize_optional_string,
};

/// A wedding being planned. Every other resource hangs off a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub wedding_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub guest_count_target: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            wedding_date: None,
            total_budget: None,
            guest_count_target: None,
            location: None,
        }
    }

    pub fn with_wedding_date(mut self, date: NaiveDate) -> Self {
        self.wedding_date = Some(date);
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.total_budget = Some(budget);
        self
    }

    /// Sets a specific ID for this project (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Request body for creating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wedding_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count_target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Request body for a partial project update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wedding_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count_target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Headline numbers for the project dashboard, as served by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_budget: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_spent: f64,
    #[serde(default)]
    pub total_guests: usize,
    #[serde(default)]
    pub confirmed_guests: usize,
    #[serde(default)]
    pub total_tasks: usize,
    #[serde(default)]
    pub completed_tasks: usize,
    #[serde(default)]
    pub total_vendors: usize,
    #[serde(default)]
    pub booked_vendors: usize,
    #[serde(default)]
    pub days_until_wedding: Option<i64>,
}
