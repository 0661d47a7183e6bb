//! Scheduler layer for the tracker
//!
//! This layer repeatedly queries the remote service for the status of one
//! job until it reaches a terminal state or polling is cancelled.

pub mod poller;

pub use poller::{PollControl, PollEvent, PollHandle, PollSession, StatusPoller, TickOutcome};
