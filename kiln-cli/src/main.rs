//! Kiln CLI
//!
//! Command-line front end for turning images into 3D assets with a remote
//! generation service.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Image-to-3D asset generation CLI", long_about = None)]
struct Cli {
    /// Generation service URL
    #[arg(long, env = "KILN_SERVICE_URL")]
    service_url: Option<String>,

    /// Delay between status queries in milliseconds
    #[arg(long, env = "KILN_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Upper bound on a single HTTP request in seconds
    #[arg(long, env = "KILN_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kiln_cli=warn,kiln_tracker=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::load_config(config::Overrides {
        service_url: cli.service_url,
        poll_interval_ms: cli.poll_interval_ms,
        request_timeout_secs: cli.request_timeout_secs,
    })?;

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_task_commands_are_top_level() {
        let cli = Cli::try_parse_from(["kiln", "status", "task_1"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { ref id } if id == "task_1"));

        let cli = Cli::try_parse_from(["kiln", "download", "task_1", "--format", "obj"]).unwrap();
        assert!(matches!(cli.command, Commands::Download(_)));

        assert!(Cli::try_parse_from(["kiln", "task", "status", "task_1"]).is_err());
    }

    #[test]
    fn test_env_fills_unset_flags() {
        // The only test in this binary that touches the process environment
        unsafe {
            std::env::remove_var("KILN_SERVICE_URL");
            std::env::remove_var("KILN_REQUEST_TIMEOUT_SECS");
            std::env::set_var("KILN_POLL_INTERVAL_MS", "250");
        }

        let cli = Cli::try_parse_from(["kiln", "health"]).unwrap();
        assert_eq!(cli.service_url, None);
        assert_eq!(cli.poll_interval_ms, Some(250));

        let config = config::load_config(config::Overrides {
            service_url: cli.service_url,
            poll_interval_ms: cli.poll_interval_ms,
            request_timeout_secs: cli.request_timeout_secs,
        })
        .unwrap();
        assert_eq!(config.service_url, kiln_tracker::config::DEFAULT_SERVICE_URL);
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        let cli = Cli::try_parse_from(["kiln", "--poll-interval-ms", "500", "health"]).unwrap();
        assert_eq!(cli.poll_interval_ms, Some(500));

        unsafe {
            std::env::remove_var("KILN_POLL_INTERVAL_MS");
        }
    }
}
