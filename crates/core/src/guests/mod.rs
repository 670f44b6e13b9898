mod error;
mod operations;
mod types;

pub use error::GuestError;
pub use operations::{
    guest_stats, search_guests, validate_guest_patch, validate_new_guest, GuestStats,
};
pub use types::{Guest, GuestPatch, NewGuest, RsvpStatus};
