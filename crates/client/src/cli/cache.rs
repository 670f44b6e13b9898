//! Local state CLI commands.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Forget the stored session and all cached data.
    Clear,
}
