//! CLI command definitions.

pub mod auth;
pub mod budget;
pub mod cache;
pub mod guests;
pub mod projects;
pub mod tasks;
pub mod vendors;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

/// CLI client for the planhaus API.
#[derive(Debug, Parser)]
#[command(name = "planhaus")]
#[command(about = "CLI client for the planhaus wedding planning API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "PLANHAUS_URL", default_value = "http://localhost:5000")]
    pub base_url: String,

    /// Where the session is kept between runs.
    #[arg(long, env = "PLANHAUS_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Fail instead of signing in as the demo user when the session expires.
    #[arg(long)]
    pub no_demo_fallback: bool,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out and inspect the session.
    Auth(auth::AuthCommand),
    /// Project management.
    Projects(projects::ProjectsCommand),
    /// Budget items and summary.
    Budget(budget::BudgetCommand),
    /// Vendor management.
    Vendors(vendors::VendorsCommand),
    /// Guest list and RSVPs.
    Guests(guests::GuestsCommand),
    /// Timeline tasks.
    Tasks(tasks::TasksCommand),
    /// Project dashboard.
    Dashboard {
        /// Project ID.
        project_id: Uuid,
        /// Compute the figures from the resource lists instead of asking
        /// the server.
        #[arg(long)]
        local: bool,
    },
    /// Send a PDF, Excel or CSV document for analysis.
    Analyze {
        /// File to upload.
        file: PathBuf,
    },
    /// Local state.
    Cache(cache::CacheCommand),
}
