//! Generate command handler
//!
//! Submits an image through the job orchestrator and renders its state until
//! the job completes or fails. A timeout or Ctrl-C resets the orchestrator,
//! which cancels any pending status query.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use colored::*;
use kiln_core::domain::artifact::ExportFormat;
use kiln_core::domain::job::{Job, JobState};
use kiln_core::domain::upload::ImageUpload;
use kiln_tracker::{Config, JobOrchestrator, OrchestratorView};
use tokio::sync::watch;
use tracing::info;

use crate::commands::task::{default_output, download_artifact};
use crate::render::{ProgressRenderer, print_error_banner, print_failure_panel, print_job_details};

/// Arguments of `kiln generate`
#[derive(Args)]
pub struct GenerateArgs {
    /// Image to convert
    image: PathBuf,

    /// Download the artifact in this format once the job completes
    #[arg(short, long)]
    download: Option<ExportFormat>,

    /// Where to write the downloaded artifact
    #[arg(short, long, requires = "download")]
    output: Option<PathBuf>,

    /// Stop following the job after this many seconds
    #[arg(long)]
    timeout: Option<u64>,
}

/// Handle `kiln generate`
pub async fn handle_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let upload = ImageUpload::from_path(&args.image)
        .await
        .with_context(|| format!("Failed to read image {}", args.image.display()))?;

    if !upload.is_image() {
        bail!(
            "{} is not a supported image (png, jpg, jpeg, webp, gif, bmp)",
            args.image.display()
        );
    }

    let client = Arc::new(config.client()?);
    let orchestrator = JobOrchestrator::new(Arc::clone(&client), config.poll_interval);
    let mut updates = orchestrator.subscribe();

    println!(
        "{} {} ({} bytes) to {}",
        "Uploading".bold(),
        upload.file_name.cyan(),
        upload.len(),
        client.base_url().dimmed()
    );

    let task_id = match orchestrator.submit(Some(&upload)).await {
        Ok(task_id) => task_id,
        Err(e) => {
            print_error_banner(&e.to_string());
            return Err(anyhow!(e).context("Submission failed"));
        }
    };
    println!("{} task {}", "Submitted".bold(), task_id.to_string().cyan());

    let give_up = async {
        match args.timeout {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };

    let job = tokio::select! {
        job = follow(&mut updates) => job?,
        _ = give_up => {
            orchestrator.reset();
            bail!(
                "Stopped following task {} after {}s; it may still finish on the service",
                task_id,
                args.timeout.unwrap_or_default()
            );
        }
        _ = tokio::signal::ctrl_c() => {
            orchestrator.reset();
            bail!("Interrupted; stopped following task {}", task_id);
        }
    };

    println!();
    match job.state {
        JobState::Completed => {
            print_job_details(&job);

            if let Some(format) = args.download {
                let path = args
                    .output
                    .unwrap_or_else(|| default_output(&job.id, format));
                println!();
                download_artifact(&client, &job.id, format, &path).await?;
            }

            Ok(())
        }
        _ => {
            print_failure_panel(&job);
            let detail = job.error.unwrap_or_default();
            bail!("Task {} failed: {}", job.id, detail)
        }
    }
}

/// Renders every published change until the job is terminal
async fn follow(updates: &mut watch::Receiver<OrchestratorView>) -> Result<Job> {
    let mut renderer = ProgressRenderer::default();

    loop {
        let view = updates.borrow_and_update().clone();
        renderer.render(&view);

        if let Some(job) = view.job.filter(|job| job.is_terminal()) {
            info!("Task {} finished as {}", job.id, job.state);
            return Ok(job);
        }

        updates
            .changed()
            .await
            .context("Job orchestrator stopped publishing updates")?;
    }
}
