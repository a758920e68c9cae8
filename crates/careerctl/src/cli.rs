//! Command-line argument parsing.
//!
//! Keeps argument parsing separate from execution logic; env fallbacks for
//! the connection flags are resolved in the client, not here.

use clap::{Parser, Subcommand};

/// Career service admin CLI
#[derive(Parser)]
#[command(name = "careerctl")]
#[command(about = "Career service admin CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Daemon base URL (overrides $CAREERD_URL and the default)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Shared bearer secret (overrides $CAREERD_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Identity forwarded to the daemon as X-User-Id
    #[arg(long, global = true)]
    pub user_id: Option<i64>,

    /// Send the admin role header
    #[arg(long, global = true)]
    pub admin: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage careers
    Career {
        #[command(subcommand)]
        action: CareerCommands,
    },

    /// Manage career steps
    Step {
        #[command(subcommand)]
        action: StepCommands,
    },

    /// Show a user's progress overview (admin)
    Progress {
        /// Platform user id
        user_id: i64,
    },

    /// Recompute progress for every user (admin)
    Sync,

    /// Per-career completion totals (admin)
    Summary,

    /// Daemon liveness
    Health,
}

#[derive(Subcommand)]
pub enum CareerCommands {
    /// List careers with the forwarded identity's completion
    List,

    /// Create a career (admin)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Update career fields; an empty string clears a field (admin)
    Update {
        career_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a career and everything under it (admin)
    Delete { career_id: i64 },
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// List a career's steps with the forwarded identity's completion
    List { career_id: i64 },

    /// Create a step (admin)
    Create {
        #[arg(long)]
        career_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        challenge_id: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        required_solves: Option<i64>,
    },

    /// Update step fields; an empty string clears a field (admin)
    Update {
        step_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        challenge_id: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        required_solves: Option<i64>,
    },

    /// Delete a step (admin)
    Delete { step_id: i64 },
}
