//! Health and service information DTOs

use serde::{Deserialize, Serialize};

/// Readiness flags reported by `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub triposr_initialized: bool,
    #[serde(default)]
    pub blender_available: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Banner returned by the service root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
}
