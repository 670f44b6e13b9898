use serde::Serialize;

use super::error::GuestError;
use super::types::{Guest, GuestPatch, NewGuest, RsvpStatus};
use crate::format::percent_of;
use crate::validation::{is_blank, is_plausible_email, too_long, MAX_TEXT_LEN};

/// RSVP counts for a guest list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestStats {
    pub total: usize,
    pub attending: usize,
    pub declined: usize,
    pub pending: usize,
    pub maybe: usize,
    /// Attending guests plus their plus-ones.
    pub headcount: u32,
    /// Share of guests who have replied, clamped to `[0, 100]`.
    pub response_rate: f64,
}

/// Counts RSVPs across the list.
pub fn guest_stats(guests: &[Guest]) -> GuestStats {
    let mut stats = GuestStats {
        total: guests.len(),
        ..Default::default()
    };
    for guest in guests {
        match guest.rsvp_status {
            RsvpStatus::Attending => {
                stats.attending += 1;
                stats.headcount += guest.headcount();
            }
            RsvpStatus::Declined => stats.declined += 1,
            RsvpStatus::Pending => stats.pending += 1,
            RsvpStatus::Maybe => stats.maybe += 1,
        }
    }
    let replied = stats.total - stats.pending;
    stats.response_rate = percent_of(replied as f64, stats.total as f64);
    stats
}

/// Guests whose name or email contains the term, case-insensitively.
pub fn search_guests<'a>(guests: &'a [Guest], term: &str) -> Vec<&'a Guest> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return guests.iter().collect();
    }
    guests
        .iter()
        .filter(|g| {
            g.name.to_lowercase().contains(&term)
                || g.email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&term))
        })
        .collect()
}

fn check_email(email: Option<&str>) -> Result<(), GuestError> {
    match email.filter(|e| !is_blank(e)) {
        Some(e) if !is_plausible_email(e) => Err(GuestError::InvalidEmail(e.to_string())),
        _ => Ok(()),
    }
}

/// Validates a guest before creation.
pub fn validate_new_guest(guest: &NewGuest) -> Result<(), GuestError> {
    if is_blank(&guest.name) {
        return Err(GuestError::EmptyName);
    }
    if too_long(&guest.name, MAX_TEXT_LEN) {
        return Err(GuestError::NameTooLong);
    }
    if guest.table_number == Some(0) {
        return Err(GuestError::InvalidTable);
    }
    check_email(guest.email.as_deref())
}

/// Validates the fields present in a partial update.
pub fn validate_guest_patch(patch: &GuestPatch) -> Result<(), GuestError> {
    if let Some(name) = &patch.name {
        if is_blank(name) {
            return Err(GuestError::EmptyName);
        }
        if too_long(name, MAX_TEXT_LEN) {
            return Err(GuestError::NameTooLong);
        }
    }
    if patch.table_number == Some(0) {
        return Err(GuestError::InvalidTable);
    }
    check_email(patch.email.as_deref())
}
