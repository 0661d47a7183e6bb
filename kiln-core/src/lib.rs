//! Kiln Core
//!
//! Core types shared by the Kiln image-to-asset client crates.
//!
//! This crate contains:
//! - Domain types: the tracked generation job and the submitted image
//! - DTOs: the wire shapes of the remote generation service

pub mod domain;
pub mod dto;
