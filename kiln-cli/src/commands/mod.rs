//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod generate;
mod health;
mod task;

pub use generate::GenerateArgs;
pub use task::DownloadArgs;

use anyhow::Result;
use clap::Subcommand;
use kiln_tracker::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit an image and follow the job until it finishes
    Generate(GenerateArgs),
    /// Show the current status of a task
    Status {
        /// Task ID returned at submission
        id: String,
    },
    /// Download the artifact of a completed task
    Download(DownloadArgs),
    /// Show the service's readiness flags
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate(args) => generate::handle_generate(args, config).await,
        Commands::Status { id } => task::handle_status(id, config).await,
        Commands::Download(args) => task::handle_download(args, config).await,
        Commands::Health => health::show_health(config).await,
    }
}
