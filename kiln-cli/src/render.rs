//! Terminal rendering of jobs, snapshots and health

use colored::*;
use kiln_core::domain::job::{Job, JobState};
use kiln_core::dto::health::HealthStatus;
use kiln_core::dto::task::TaskStatus;
use kiln_tracker::{OrchestratorView, Phase};

const BAR_WIDTH: usize = 30;

/// Prints a line whenever the visible progress of a job changes
#[derive(Default)]
pub struct ProgressRenderer {
    last: Option<(Phase, u8, String)>,
    failures_seen: u32,
}

impl ProgressRenderer {
    pub fn render(&mut self, view: &OrchestratorView) {
        if view.poll_failures > self.failures_seen {
            if let Some(error) = &view.last_poll_error {
                println!(
                    "  {} {}",
                    "status check failed, retrying:".dimmed(),
                    error.dimmed()
                );
            }
        }
        self.failures_seen = view.poll_failures;

        let Some(job) = &view.job else {
            return;
        };

        let current = (view.phase(), job.progress, job.current_step.clone());
        if self.last.as_ref() == Some(&current) {
            return;
        }

        println!(
            "  {} {:>3}% {:<12} {}",
            progress_bar(job.progress),
            job.progress,
            colorize_state(&job.state),
            job.current_step.dimmed()
        );
        self.last = Some(current);
    }
}

/// Fixed-width bar for a percentage
pub fn progress_bar(progress: u8) -> String {
    let filled = (progress.min(100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Print detailed job information
pub fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  Task ID:     {}", job.id.to_string().cyan());
    println!("  State:       {}", colorize_state(&job.state));
    println!("  Progress:    {}%", job.progress);
    println!("  Step:        {}", job.current_step);
    println!(
        "  Submitted:   {}",
        job.submitted_at.format("%Y-%m-%d %H:%M:%S")
    );

    let seconds = job
        .updated_at
        .signed_duration_since(job.submitted_at)
        .num_seconds();
    println!("  Duration:    {}s", seconds);

    if let Some(url) = &job.result_url {
        println!("  Artifact:    {}", url.green());
    }
    if let Some(url) = &job.mesh_url {
        println!("  Mesh:        {}", url.green());
    }
}

/// Print the failure panel of a job the service reported as failed
pub fn print_failure_panel(job: &Job) {
    println!();
    println!("{}", "Generation failed".red().bold());
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {}",
        job.error.as_deref().unwrap_or("No details reported").red()
    );
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", "Run `kiln generate` again to retry.".dimmed());
}

/// Print a single-line submission error banner
pub fn print_error_banner(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
}

/// Print a raw status snapshot
pub fn print_task_status(status: &TaskStatus) {
    println!("{}", "Task Status:".bold());
    println!("  Task ID:     {}", status.task_id.to_string().cyan());
    println!("  State:       {}", colorize_state(&status.status));
    println!(
        "  Progress:    {} {}%",
        progress_bar(status.progress.clamp(0, 100) as u8),
        status.progress
    );
    println!("  Step:        {}", status.current_step);

    if let Some(url) = &status.result_url {
        println!("  Artifact:    {}", url.green());
    }
    if let Some(url) = &status.mesh_url {
        println!("  Mesh:        {}", url.green());
    }
    if let Some(error) = &status.error {
        println!("  Error:       {}", error.red());
    }
}

/// Print service readiness
pub fn print_health(health: &HealthStatus) {
    let status = if health.is_healthy() {
        health.status.green()
    } else {
        health.status.red()
    };

    println!("{}", "Service Health:".bold());
    println!("  Status:      {}", status);
    println!("  Model ready: {}", check_mark(health.triposr_initialized));
    println!("  Blender:     {}", check_mark(health.blender_available));
}

fn check_mark(ok: bool) -> ColoredString {
    if ok { "✓".green() } else { "✗".red() }
}

/// Colorize job state for display
pub fn colorize_state(state: &JobState) -> ColoredString {
    let state_str = state.to_string();
    match state {
        JobState::Queued => state_str.yellow(),
        JobState::Processing => state_str.cyan(),
        JobState::Completed => state_str.green(),
        JobState::Failed => state_str.red(),
    }
}
