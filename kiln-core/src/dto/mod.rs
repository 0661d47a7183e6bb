//! Data Transfer Objects for the remote generation service
//!
//! These types mirror the JSON bodies exchanged with the service. They are
//! decoded by the client and then folded into domain types.

pub mod health;
pub mod task;
