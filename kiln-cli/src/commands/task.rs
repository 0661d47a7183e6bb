//! Task command handlers
//!
//! One-shot queries against a task ID, without tracking its lifecycle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use kiln_client::GenerationClient;
use kiln_core::domain::artifact::ExportFormat;
use kiln_core::domain::job::TaskId;
use kiln_tracker::Config;

use crate::render::print_task_status;

/// Arguments of `kiln download`
#[derive(Args)]
pub struct DownloadArgs {
    /// Task ID returned at submission
    id: String,

    /// Export format (fbx or obj)
    #[arg(short, long, default_value = "fbx")]
    format: ExportFormat,

    /// Output path (defaults to ugc_<task>.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Handle `kiln status`
pub async fn handle_status(id: String, config: &Config) -> Result<()> {
    let client = config.client()?;
    let task_id = TaskId::new(id);

    let status = client
        .get_task(&task_id)
        .await
        .with_context(|| format!("Failed to fetch status of task {}", task_id))?;

    print_task_status(&status);
    Ok(())
}

/// Handle `kiln download`
pub async fn handle_download(args: DownloadArgs, config: &Config) -> Result<()> {
    let client = config.client()?;
    let task_id = TaskId::new(args.id);
    let path = args
        .output
        .unwrap_or_else(|| default_output(&task_id, args.format));

    download_artifact(&client, &task_id, args.format, &path).await
}

/// Download an artifact and write it to `path`
pub async fn download_artifact(
    client: &GenerationClient,
    task_id: &TaskId,
    format: ExportFormat,
    path: &Path,
) -> Result<()> {
    let bytes = client
        .download(task_id, format)
        .await
        .with_context(|| format!("Failed to download {} artifact of task {}", format, task_id))?;

    tokio::fs::write(path, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Saved {} ({} bytes)",
        "✓".green(),
        path.display().to_string().bold(),
        bytes.len()
    );
    Ok(())
}

/// File name used when no output path is given
pub fn default_output(task_id: &TaskId, format: ExportFormat) -> PathBuf {
    PathBuf::from(format!("ugc_{}.{}", task_id, format.extension()))
}
