//! Budget CLI commands.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Budget commands.
#[derive(Debug, Parser)]
pub struct BudgetCommand {
    #[command(subcommand)]
    pub action: BudgetAction,
}

/// Available budget actions.
#[derive(Debug, Subcommand)]
pub enum BudgetAction {
    /// List budget items.
    List {
        /// Project ID.
        project_id: Uuid,
        /// Only items of this category.
        #[arg(long)]
        category: Option<String>,
    },
    /// Totals and per-category spending.
    Summary {
        /// Project ID.
        project_id: Uuid,
    },
    /// Add a budget item.
    Add {
        /// Project ID.
        project_id: Uuid,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: String,
        /// Estimated cost.
        #[arg(long)]
        estimated: f64,
        /// Actual cost, once known.
        #[arg(long)]
        actual: Option<f64>,
        #[arg(long)]
        paid: bool,
        #[arg(long)]
        vendor: Option<String>,
    },
    /// Delete a budget item.
    Delete {
        /// Project ID.
        project_id: Uuid,
        /// Item ID.
        id: Uuid,
    },
}
