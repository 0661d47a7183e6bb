//! Service seam consumed by the job tracker
//!
//! The tracker only needs to submit work and read status, so it depends on
//! this trait rather than on the HTTP client. Tests drive it with fakes.

use async_trait::async_trait;
use kiln_core::domain::job::TaskId;
use kiln_core::domain::upload::ImageUpload;
use kiln_core::dto::task::{GenerationResponse, TaskStatus};

use crate::GenerationClient;
use crate::error::Result;

/// Remote job service contract
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submits an image and returns the service's acknowledgement
    async fn submit(&self, upload: &ImageUpload) -> Result<GenerationResponse>;

    /// Fetches the current status snapshot of a task
    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatus>;
}

#[async_trait]
impl JobService for GenerationClient {
    async fn submit(&self, upload: &ImageUpload) -> Result<GenerationResponse> {
        self.submit_image(upload).await
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatus> {
        self.get_task(task_id).await
    }
}
