//! Core domain types
//!
//! This module contains the structures the client side reasons about.
//! A `Job` is owned by the lifecycle orchestrator; an `ImageUpload` is
//! owned by whoever selected the image and only forwarded on submission.

pub mod artifact;
pub mod job;
pub mod upload;
