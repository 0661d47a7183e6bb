//! Task DTOs exchanged with the generation service

use serde::{Deserialize, Serialize};

use crate::domain::job::{JobState, TaskId};

/// Input kind segment of the submission route (`POST /generate/<kind>`)
pub const IMAGE_INPUT_KIND: &str = "image-to-ugc";

/// Response to an accepted submission
///
/// `status` is informational; a new job always starts out queued locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub task_id: TaskId,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Full status snapshot of a task, replacing any previous one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub status: JobState,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub current_step: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Error body returned with non-success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
