//! Service layer
//!
//! Sits between the orchestrator and the remote job service. Services here
//! never touch orchestrator state; they return results for it to apply.

mod submission;

pub use submission::SubmissionGateway;
