//! Health command handler

use anyhow::{Context, Result};
use colored::*;
use kiln_tracker::Config;

use crate::render::print_health;

/// Query and display service readiness
pub async fn show_health(config: &Config) -> Result<()> {
    let client = config.client()?;

    let health = client
        .health()
        .await
        .with_context(|| format!("Failed to reach {}", client.base_url()))?;

    if let Ok(info) = client.service_info().await {
        println!("{} ({})", info.message.bold(), info.status.dimmed());
        println!();
    }

    print_health(&health);
    Ok(())
}
