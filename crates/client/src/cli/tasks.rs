//! Task CLI commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use planhaus_core::tasks::TaskPriority;
use uuid::Uuid;

/// Timeline task commands.
#[derive(Debug, Parser)]
pub struct TasksCommand {
    #[command(subcommand)]
    pub action: TasksAction,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl From<Priority> for TaskPriority {
    fn from(p: Priority) -> Self {
        match p {
            Priority::High => TaskPriority::High,
            Priority::Medium => TaskPriority::Medium,
            Priority::Low => TaskPriority::Low,
        }
    }
}

/// Available task actions.
#[derive(Debug, Subcommand)]
pub enum TasksAction {
    /// List tasks by due date.
    List {
        /// Project ID.
        project_id: Uuid,
    },
    /// Add a task.
    Add {
        /// Project ID.
        project_id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        category: Option<String>,
    },
    /// Mark a task done, or open again.
    Toggle {
        /// Project ID.
        project_id: Uuid,
        /// Task ID.
        id: Uuid,
    },
    /// Delete a task.
    Delete {
        /// Project ID.
        project_id: Uuid,
        /// Task ID.
        id: Uuid,
    },
    /// Progress figures.
    Stats {
        /// Project ID.
        project_id: Uuid,
    },
}
