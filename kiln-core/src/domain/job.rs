//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::task::TaskStatus;

/// Step label a freshly submitted job starts with, before the first poll lands.
pub const INITIAL_STEP: &str = "Processing uploaded image";

/// Failure detail used when the service reports `failed` without a cause.
pub const DEFAULT_FAILURE_DETAIL: &str = "Generation failed";

/// Opaque job identifier assigned by the generation service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Job lifecycle state as reported by the service
///
/// Exactly one state holds at a time. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobState {
    /// Whether no further transitions can happen without a reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the job still needs polling
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Processing)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Queued => write!(f, "Queued"),
            JobState::Processing => write!(f, "Processing"),
            JobState::Completed => write!(f, "Completed"),
            JobState::Failed => write!(f, "Failed"),
        }
    }
}

/// A submitted image-to-asset conversion and its tracked progress
///
/// `result_url` and `mesh_url` are only populated in `Completed`;
/// `error` is only populated in `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: TaskId,
    pub state: JobState,
    pub progress: u8,
    pub current_step: String,
    pub result_url: Option<String>,
    pub mesh_url: Option<String>,
    pub error: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates the starting point for a job the service has just accepted
    pub fn queued(id: TaskId) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: JobState::Queued,
            progress: 0,
            current_step: INITIAL_STEP.to_string(),
            result_url: None,
            mesh_url: None,
            error: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Replaces the tracked fields with a status snapshot
    ///
    /// The snapshot's `status` alone decides the new state. Progress is taken
    /// as reported (clamped into 0..=100), including when it moves backwards.
    /// Returns `false` and leaves the job untouched when the job is already
    /// terminal or the snapshot belongs to another job.
    pub fn apply(&mut self, status: &TaskStatus) -> bool {
        if self.is_terminal() || status.task_id != self.id {
            return false;
        }

        self.state = status.status;
        self.progress = clamp_progress(status.progress);
        self.current_step = status.current_step.clone();
        self.updated_at = Utc::now();

        match self.state {
            JobState::Completed => {
                self.result_url = status.result_url.clone();
                self.mesh_url = status.mesh_url.clone();
                self.error = None;
            }
            JobState::Failed => {
                self.result_url = None;
                self.mesh_url = None;
                self.error = Some(
                    status
                        .error
                        .clone()
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| DEFAULT_FAILURE_DETAIL.to_string()),
                );
            }
            JobState::Queued | JobState::Processing => {
                self.result_url = None;
                self.mesh_url = None;
                self.error = None;
            }
        }

        true
    }
}

fn clamp_progress(progress: i64) -> u8 {
    progress.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: JobState, progress: i64) -> TaskStatus {
        TaskStatus {
            task_id: TaskId::new("abc"),
            status,
            progress,
            current_step: "Meshing".to_string(),
            result_url: None,
            mesh_url: None,
            error: None,
        }
    }

    #[test]
    fn test_queued_job_starts_at_zero() {
        let job = Job::queued(TaskId::new("abc"));
        assert_eq!(job.state, JobState::Queued);
        assert_eq!(job.progress, 0);
        assert_eq!(job.current_step, INITIAL_STEP);
        assert!(job.result_url.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_apply_updates_in_place() {
        let mut job = Job::queued(TaskId::new("abc"));
        assert!(job.apply(&snapshot(JobState::Processing, 40)));
        assert_eq!(job.state, JobState::Processing);
        assert_eq!(job.progress, 40);
        assert_eq!(job.current_step, "Meshing");
    }

    #[test]
    fn test_apply_tolerates_progress_going_backwards() {
        let mut job = Job::queued(TaskId::new("abc"));
        job.apply(&snapshot(JobState::Processing, 70));
        job.apply(&snapshot(JobState::Processing, 20));
        assert_eq!(job.progress, 20);
        assert_eq!(job.state, JobState::Processing);
    }

    #[test]
    fn test_apply_clamps_out_of_range_progress() {
        let mut job = Job::queued(TaskId::new("abc"));
        job.apply(&snapshot(JobState::Processing, 250));
        assert_eq!(job.progress, 100);
        job.apply(&snapshot(JobState::Processing, -5));
        assert_eq!(job.progress, 0);
    }

    #[test]
    fn test_state_comes_from_status_not_progress() {
        let mut job = Job::queued(TaskId::new("abc"));
        job.apply(&snapshot(JobState::Processing, 100));
        assert_eq!(job.state, JobState::Processing);
        assert!(job.result_url.is_none());
    }

    #[test]
    fn test_completed_carries_artifacts() {
        let mut job = Job::queued(TaskId::new("abc"));
        let mut status = snapshot(JobState::Completed, 100);
        status.result_url = Some("/files/abc.fbx".to_string());
        status.mesh_url = Some("/files/abc.obj".to_string());
        status.error = Some("ignored".to_string());

        job.apply(&status);
        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.result_url.as_deref(), Some("/files/abc.fbx"));
        assert_eq!(job.mesh_url.as_deref(), Some("/files/abc.obj"));
        assert!(job.error.is_none());
    }

    #[test]
    fn test_failed_carries_error_detail() {
        let mut job = Job::queued(TaskId::new("abc"));
        let mut status = snapshot(JobState::Failed, 50);
        status.error = Some("Mesh extraction timed out".to_string());
        status.result_url = Some("/files/abc.fbx".to_string());

        job.apply(&status);
        assert_eq!(job.state, JobState::Failed);
        assert_eq!(job.error.as_deref(), Some("Mesh extraction timed out"));
        assert!(job.result_url.is_none());
    }

    #[test]
    fn test_failed_without_error_gets_default_detail() {
        let mut job = Job::queued(TaskId::new("abc"));
        job.apply(&snapshot(JobState::Failed, 0));
        assert_eq!(job.error.as_deref(), Some(DEFAULT_FAILURE_DETAIL));
    }

    #[test]
    fn test_terminal_job_is_immutable() {
        let mut job = Job::queued(TaskId::new("abc"));
        job.apply(&snapshot(JobState::Completed, 100));
        let frozen = job.clone();

        assert!(!job.apply(&snapshot(JobState::Processing, 10)));
        assert_eq!(job, frozen);
    }

    #[test]
    fn test_snapshot_for_other_job_is_ignored() {
        let mut job = Job::queued(TaskId::new("abc"));
        let mut status = snapshot(JobState::Processing, 40);
        status.task_id = TaskId::new("other");

        assert!(!job.apply(&status));
        assert_eq!(job.state, JobState::Queued);
    }

    #[test]
    fn test_state_wire_names() {
        assert_eq!(
            serde_json::to_string(&JobState::Processing).unwrap(),
            "\"processing\""
        );
        let state: JobState = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(state, JobState::Failed);
    }
}
