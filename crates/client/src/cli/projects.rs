//! Project CLI commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Project management commands.
#[derive(Debug, Parser)]
pub struct ProjectsCommand {
    #[command(subcommand)]
    pub action: ProjectsAction,
}

/// Available project actions.
#[derive(Debug, Subcommand)]
pub enum ProjectsAction {
    /// List all projects.
    List,
    /// Get project by ID.
    Get {
        /// Project ID.
        id: Uuid,
    },
    /// Create a new project.
    Create {
        /// Project name.
        #[arg(long)]
        name: String,
        /// Wedding date (YYYY-MM-DD).
        #[arg(long)]
        wedding_date: Option<NaiveDate>,
        /// Total budget.
        #[arg(long)]
        budget: Option<f64>,
        /// Target number of guests.
        #[arg(long)]
        guests: Option<u32>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete project by ID.
    Delete {
        /// Project ID.
        id: Uuid,
    },
}
