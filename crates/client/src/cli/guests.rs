//! Guest CLI commands.

use clap::{Parser, Subcommand, ValueEnum};
use planhaus_core::guests::RsvpStatus as CoreRsvpStatus;
use uuid::Uuid;

/// Guest list commands.
#[derive(Debug, Parser)]
pub struct GuestsCommand {
    #[command(subcommand)]
    pub action: GuestsAction,
}

/// CLI RSVP status (with clap ValueEnum).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Rsvp {
    Pending,
    Attending,
    Declined,
    Maybe,
}

impl From<Rsvp> for CoreRsvpStatus {
    fn from(r: Rsvp) -> Self {
        match r {
            Rsvp::Pending => CoreRsvpStatus::Pending,
            Rsvp::Attending => CoreRsvpStatus::Attending,
            Rsvp::Declined => CoreRsvpStatus::Declined,
            Rsvp::Maybe => CoreRsvpStatus::Maybe,
        }
    }
}

/// Available guest actions.
#[derive(Debug, Subcommand)]
pub enum GuestsAction {
    /// List guests with RSVP counts.
    List {
        /// Project ID.
        project_id: Uuid,
        /// Case-insensitive search over name and email.
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a guest.
    Add {
        /// Project ID.
        project_id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        plus_one: bool,
        #[arg(long)]
        table: Option<u32>,
    },
    /// Record a guest's RSVP.
    Rsvp {
        /// Project ID.
        project_id: Uuid,
        /// Guest ID.
        id: Uuid,
        status: Rsvp,
    },
    /// Delete a guest.
    Delete {
        /// Project ID.
        project_id: Uuid,
        /// Guest ID.
        id: Uuid,
    },
}
