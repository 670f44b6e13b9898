use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::{deserialize_optional_amount, deserialize_optional_string};

/// Where a vendor is in the hiring pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    #[default]
    Researching,
    Contacted,
    Quoted,
    Booked,
    Declined,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl VendorStatus {
    /// Ordering rank used when sorting by status.
    pub fn rank(&self) -> u8 {
        match self {
            VendorStatus::Booked => 0,
            VendorStatus::Quoted => 1,
            VendorStatus::Contacted => 2,
            VendorStatus::Researching => 3,
            VendorStatus::Declined => 4,
            VendorStatus::Unknown => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::Researching => "researching",
            VendorStatus::Contacted => "contacted",
            VendorStatus::Quoted => "quoted",
            VendorStatus::Booked => "booked",
            VendorStatus::Declined => "declined",
            VendorStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supplier tracked for a project (venue, photographer, florist, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub status: VendorStatus,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub cost: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub notes: Option<String>,
}

impl Vendor {
    pub fn new(project_id: Uuid, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: name.into(),
            category: category.into(),
            status: VendorStatus::default(),
            is_booked: false,
            contact_name: None,
            email: None,
            phone: None,
            website: None,
            cost: None,
            notes: None,
        }
    }

    pub fn with_status(mut self, status: VendorStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// A vendor counts as booked when either the flag or the status says so.
    pub fn booked(&self) -> bool {
        self.is_booked || self.status == VendorStatus::Booked
    }
}

/// Request body for creating a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVendor {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub status: VendorStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for a partial vendor update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VendorStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_booked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_deserializes() {
        let status: VendorStatus = serde_json::from_str(r#""negotiating""#).unwrap();
        assert_eq!(status, VendorStatus::Unknown);
    }

    #[test]
    fn test_booked_from_flag_or_status() {
        let pid = Uuid::nil();
        assert!(Vendor::new(pid, "A", "Venue")
            .with_status(VendorStatus::Booked)
            .booked());
        let mut vendor = Vendor::new(pid, "B", "Venue");
        assert!(!vendor.booked());
        vendor.is_booked = true;
        assert!(vendor.booked());
    }

    #[test]
    fn test_vendor_from_server_json() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "projectId": "00000000-0000-0000-0000-000000000002",
            "name": "Bloom & Co",
            "category": "Florist",
            "status": "quoted",
            "cost": "1200.50",
            "email": ""
        }"#;
        let vendor: Vendor = serde_json::from_str(json).unwrap();
        assert_eq!(vendor.status, VendorStatus::Quoted);
        assert_eq!(vendor.cost, Some(1200.5));
        assert_eq!(vendor.email, None);
        assert!(!vendor.is_booked);
    }
}
