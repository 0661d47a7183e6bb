//! Health and service information endpoints

use crate::GenerationClient;
use crate::error::Result;
use kiln_core::dto::health::{HealthStatus, ServiceInfo};

impl GenerationClient {
    /// Fetch the service's readiness flags
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Fetch the banner served at the service root
    pub async fn service_info(&self) -> Result<ServiceInfo> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
