use serde::{Deserialize, Serialize};

use super::error::VendorError;
use super::types::{NewVendor, Vendor, VendorPatch, VendorStatus};
use crate::validation::{
    check_amount, is_blank, is_plausible_email, too_long, AmountProblem, MAX_NOTES_LEN,
    MAX_TEXT_LEN,
};

/// In-memory vendor list filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorFilter {
    /// Case-insensitive substring over name, category, contact and notes.
    pub search: Option<String>,
    /// Case-insensitive category; `"all"` matches every category.
    pub category: Option<String>,
    pub status: Option<VendorStatus>,
}

impl VendorFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, vendor: &Vendor) -> bool {
        self.matches_search(vendor) && self.matches_category(vendor) && self.matches_status(vendor)
    }

    fn matches_search(&self, vendor: &Vendor) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        [
            Some(vendor.name.as_str()),
            Some(vendor.category.as_str()),
            vendor.contact_name.as_deref(),
            vendor.email.as_deref(),
            vendor.notes.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_category(&self, vendor: &Vendor) -> bool {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(c) if c.eq_ignore_ascii_case("all") => true,
            Some(c) => vendor.category.to_lowercase() == c.to_lowercase(),
        }
    }

    fn matches_status(&self, vendor: &Vendor) -> bool {
        match self.status {
            None => true,
            Some(VendorStatus::Booked) => vendor.booked(),
            Some(status) => vendor.status == status && !vendor.booked(),
        }
    }
}

/// Returns the vendors selected by the filter, in their original order.
pub fn filter_vendors<'a>(vendors: &'a [Vendor], filter: &VendorFilter) -> Vec<&'a Vendor> {
    vendors.iter().filter(|v| filter.matches(v)).collect()
}

/// Distinct categories in first-seen order, compared case-insensitively.
pub fn vendor_categories(vendors: &[Vendor]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for vendor in vendors {
        if !seen.iter().any(|c| c.eq_ignore_ascii_case(&vendor.category)) {
            seen.push(vendor.category.clone());
        }
    }
    seen
}

fn cost(value: f64) -> Result<(), VendorError> {
    check_amount(value).map_err(|p| match p {
        AmountProblem::NotANumber => VendorError::InvalidCost,
        AmountProblem::Negative => VendorError::NegativeCost,
    })
}

/// Validates a vendor before creation.
pub fn validate_new_vendor(vendor: &NewVendor) -> Result<(), VendorError> {
    if is_blank(&vendor.name) {
        return Err(VendorError::EmptyName);
    }
    if too_long(&vendor.name, MAX_TEXT_LEN) {
        return Err(VendorError::NameTooLong);
    }
    if is_blank(&vendor.category) {
        return Err(VendorError::EmptyCategory);
    }
    if let Some(email) = vendor.email.as_deref().filter(|e| !is_blank(e)) {
        if !is_plausible_email(email) {
            return Err(VendorError::InvalidEmail(email.to_string()));
        }
    }
    if let Some(c) = vendor.cost {
        cost(c)?;
    }
    if vendor.notes.as_deref().is_some_and(|n| too_long(n, MAX_NOTES_LEN)) {
        return Err(VendorError::NotesTooLong);
    }
    Ok(())
}

/// Validates the fields present in a partial update.
pub fn validate_vendor_patch(patch: &VendorPatch) -> Result<(), VendorError> {
    if let Some(name) = &patch.name {
        if is_blank(name) {
            return Err(VendorError::EmptyName);
        }
        if too_long(name, MAX_TEXT_LEN) {
            return Err(VendorError::NameTooLong);
        }
    }
    if patch.category.as_deref().is_some_and(is_blank) {
        return Err(VendorError::EmptyCategory);
    }
    if let Some(email) = patch.email.as_deref().filter(|e| !is_blank(e)) {
        if !is_plausible_email(email) {
            return Err(VendorError::InvalidEmail(email.to_string()));
        }
    }
    if let Some(c) = patch.cost {
        cost(c)?;
    }
    Ok(())
}
