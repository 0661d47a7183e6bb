//! Task-related API endpoints

use crate::GenerationClient;
use crate::error::{ClientError, Result};
use kiln_core::domain::artifact::ExportFormat;
use kiln_core::domain::job::TaskId;
use kiln_core::domain::upload::ImageUpload;
use kiln_core::dto::task::{GenerationResponse, IMAGE_INPUT_KIND, TaskStatus};
use reqwest::multipart::{Form, Part};
use tracing::debug;

impl GenerationClient {
    // =============================================================================
    // Task Lifecycle
    // =============================================================================

    /// Submit an image for conversion
    ///
    /// The image is sent as the `file` part of a multipart form.
    ///
    /// # Returns
    /// The service's acknowledgement, carrying the new task ID
    pub async fn submit_image(&self, upload: &ImageUpload) -> Result<GenerationResponse> {
        let url = format!("{}/generate/{}", self.base_url, IMAGE_INPUT_KIND);

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| {
                ClientError::InvalidRequest(format!(
                    "Invalid content type '{}': {}",
                    upload.content_type, e
                ))
            })?;
        let form = Form::new().part("file", part);

        debug!(
            "Submitting {} ({} bytes) to {}",
            upload.file_name,
            upload.len(),
            url
        );
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_response(response).await
    }

    /// Get the current status snapshot of a task
    pub async fn get_task(&self, task_id: &TaskId) -> Result<TaskStatus> {
        let url = format!("{}/task/{}", self.base_url, task_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await.map_err(|e| match e {
            ClientError::ApiError { status: 404, .. } => {
                ClientError::NotFound(format!("task {}", task_id))
            }
            other => other,
        })
    }

    // =============================================================================
    // Artifacts
    // =============================================================================

    /// Download the artifact of a completed task
    ///
    /// # Arguments
    /// * `task_id` - The completed task
    /// * `format` - Requested export format
    ///
    /// # Returns
    /// The raw artifact bytes
    pub async fn download(&self, task_id: &TaskId, format: ExportFormat) -> Result<Vec<u8>> {
        let url = format!("{}/download/{}", self.base_url, task_id);
        let response = self
            .client
            .get(&url)
            .query(&[("format", format.as_str())])
            .send()
            .await?;

        self.handle_bytes_response(response).await
    }
}
