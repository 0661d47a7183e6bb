//! Observable orchestrator state
//!
//! The presentation layer renders from these snapshots and uses the
//! affordance helpers to decide which actions to offer.

use kiln_core::domain::job::{Job, JobState};

/// Lifecycle phase, `Idle` when no job exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Queued,
    Processing,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl From<JobState> for Phase {
    fn from(state: JobState) -> Self {
        match state {
            JobState::Queued => Phase::Queued,
            JobState::Processing => Phase::Processing,
            JobState::Completed => Phase::Completed,
            JobState::Failed => Phase::Failed,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Queued => write!(f, "Queued"),
            Phase::Processing => write!(f, "Processing"),
            Phase::Completed => write!(f, "Completed"),
            Phase::Failed => write!(f, "Failed"),
        }
    }
}

/// Snapshot of everything the orchestrator exposes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorView {
    /// The tracked job, absent until a submission succeeds
    pub job: Option<Job>,
    /// Banner text for the last failed submission
    pub error: Option<String>,
    /// Whether a submission is awaiting the service
    pub submitting: bool,
    /// Consecutive failed status queries for the current job
    pub poll_failures: u32,
    /// Most recent status query failure, for diagnostics only
    pub last_poll_error: Option<String>,
}

impl OrchestratorView {
    pub fn phase(&self) -> Phase {
        self.job
            .as_ref()
            .map(|job| Phase::from(job.state))
            .unwrap_or_default()
    }

    /// Whether a job is being submitted or tracked
    pub fn is_active(&self) -> bool {
        self.submitting || matches!(self.phase(), Phase::Queued | Phase::Processing)
    }

    pub fn can_submit(&self) -> bool {
        self.job.is_none() && !self.submitting
    }

    pub fn can_reset(&self) -> bool {
        true
    }

    pub fn can_download(&self) -> bool {
        self.phase() == Phase::Completed
    }

    pub fn can_retry(&self) -> bool {
        self.phase() == Phase::Failed
    }
}
