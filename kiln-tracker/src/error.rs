//! Submission errors
//!
//! Caller errors are rejected before any network call. Service failures are
//! converted here so the presentation layer only ever sees a message.

use kiln_client::ClientError;
use thiserror::Error;

/// Why a submission did not produce a job
#[derive(Debug, Error)]
pub enum SubmitError {
    /// No image was selected
    #[error("No image selected")]
    MissingInput,

    /// A job is queued or processing
    #[error("A job is already in progress")]
    JobActive,

    /// Another submission is awaiting the service
    #[error("A submission is already in flight")]
    SubmissionPending,

    /// The previous job is terminal and has not been reset
    #[error("The previous job has finished; reset before submitting again")]
    ResetRequired,

    /// The image could not be encoded for upload
    #[error("{0}")]
    InvalidInput(String),

    /// The service answered with an error; carries its detail verbatim
    #[error("{0}")]
    Rejected(String),

    /// The service could not be reached
    #[error("Could not reach the generation service")]
    Unreachable,

    /// The service answered with something that is not a submission receipt
    #[error("Unexpected response from the generation service: {0}")]
    InvalidResponse(String),

    /// A reset happened while the submission was in flight
    #[error("Submission was superseded by a reset")]
    Superseded,
}

impl SubmitError {
    /// Whether the caller is at fault and no request was sent
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput
                | Self::JobActive
                | Self::SubmissionPending
                | Self::ResetRequired
                | Self::InvalidInput(_)
        )
    }
}

impl From<ClientError> for SubmitError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { message, .. } | ClientError::NotFound(message) => {
                Self::Rejected(message)
            }
            ClientError::InvalidRequest(message) => Self::InvalidInput(message),
            ClientError::ParseError(message) => Self::InvalidResponse(message),
            ClientError::RequestFailed(e) if e.is_decode() => Self::InvalidResponse(e.to_string()),
            ClientError::RequestFailed(_) => Self::Unreachable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_displays_detail_verbatim() {
        let err = SubmitError::from(ClientError::api_error(500, "GPU unavailable"));
        assert_eq!(err.to_string(), "GPU unavailable");
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_parse_failure_is_invalid_response() {
        let err = SubmitError::from(ClientError::ParseError("eof".to_string()));
        assert!(matches!(err, SubmitError::InvalidResponse(_)));
    }

    #[test]
    fn test_caller_errors() {
        assert!(SubmitError::MissingInput.is_caller_error());
        assert!(SubmitError::JobActive.is_caller_error());
        assert!(!SubmitError::Unreachable.is_caller_error());
        assert!(!SubmitError::Superseded.is_caller_error());
    }
}
