//! Job submission gateway
//!
//! Sends a selected image to the remote service and returns the assigned task
//! ID, or a `SubmitError` describing why no job was created.

use std::sync::Arc;

use kiln_client::JobService;
use kiln_core::domain::upload::ImageUpload;
use kiln_core::dto::task::GenerationResponse;
use tracing::{info, warn};

use crate::error::SubmitError;

/// Submits work to the remote job service
pub struct SubmissionGateway<S: ?Sized> {
    service: Arc<S>,
}

impl<S: JobService + ?Sized> SubmissionGateway<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Rejects a missing image before anything is sent
    pub fn require_input(upload: Option<&ImageUpload>) -> Result<&ImageUpload, SubmitError> {
        upload.ok_or(SubmitError::MissingInput)
    }

    /// Submits an image
    ///
    /// # Returns
    /// The service's receipt. Its `status` is not trusted; the caller
    /// decides the starting state of the job.
    pub async fn submit(
        &self,
        upload: Option<&ImageUpload>,
    ) -> Result<GenerationResponse, SubmitError> {
        let upload = Self::require_input(upload)?;

        info!(
            "Submitting {} ({} bytes, {})",
            upload.file_name,
            upload.len(),
            upload.content_type
        );

        match self.service.submit(upload).await {
            Ok(receipt) => {
                info!("Service accepted submission as task {}", receipt.task_id);
                Ok(receipt)
            }
            Err(e) => {
                warn!("Submission failed: {:#}", e);
                Err(SubmitError::from(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedService, sample_upload};
    use kiln_client::ClientError;

    #[tokio::test]
    async fn test_missing_input_makes_no_call() {
        let service = Arc::new(ScriptedService::new());
        let gateway = SubmissionGateway::new(Arc::clone(&service));

        let err = gateway.submit(None).await.unwrap_err();

        assert!(matches!(err, SubmitError::MissingInput));
        assert_eq!(service.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_success_returns_task_id() {
        let service = Arc::new(ScriptedService::new().accept("abc"));
        let gateway = SubmissionGateway::new(Arc::clone(&service));
        let upload = sample_upload();

        let receipt = gateway.submit(Some(&upload)).await.unwrap();

        assert_eq!(receipt.task_id.as_str(), "abc");
        assert_eq!(service.submit_calls(), 1);
    }

    #[tokio::test]
    async fn test_rejection_surfaces_detail() {
        let service = Arc::new(
            ScriptedService::new().reject(ClientError::api_error(500, "GPU unavailable")),
        );
        let gateway = SubmissionGateway::new(service);
        let upload = sample_upload();

        let err = gateway.submit(Some(&upload)).await.unwrap_err();

        assert_eq!(err.to_string(), "GPU unavailable");
    }
}
