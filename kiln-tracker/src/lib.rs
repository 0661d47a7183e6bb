//! Kiln Tracker
//!
//! Client-side lifecycle tracking for remote image-to-asset jobs.
//!
//! Architecture:
//! - Configuration: service URL, poll cadence and request timeout
//! - Service: the submission gateway in front of the remote service
//! - Scheduler: the cancellable status poller
//! - Orchestrator: the single-job state machine the presentation layer reads
//!
//! A job is submitted through the gateway, tracked by one poller at a time,
//! and discarded by an explicit reset, which also cancels any pending poll.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod scheduler;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::SubmitError;
pub use orchestrator::{JobOrchestrator, OrchestratorView, Phase};
pub use scheduler::{PollHandle, StatusPoller};
pub use service::SubmissionGateway;
