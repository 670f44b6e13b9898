//! Auth CLI commands.

use clap::{Parser, Subcommand};

/// Session commands.
#[derive(Debug, Parser)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Available auth actions.
#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Sign in as the demo user.
    Demo,
    /// Sign in with a username and password.
    Login {
        #[arg(long)]
        username: String,
        /// Password (prefer the environment variable).
        #[arg(long, env = "PLANHAUS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session.
    Logout,
    /// Show the signed-in user.
    Whoami,
}
