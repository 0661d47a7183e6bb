//! Kiln HTTP Client
//!
//! A simple, type-safe HTTP client for the remote image-to-asset generation
//! service.
//!
//! The client covers the whole service contract (submission, status, download,
//! health). The submission and status calls are also exposed through the
//! [`JobService`] trait, which is what the job tracker depends on.
//!
//! # Example
//!
//! ```no_run
//! use kiln_client::GenerationClient;
//! use kiln_core::domain::upload::ImageUpload;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GenerationClient::new("http://localhost:8000");
//!
//!     let upload = ImageUpload::from_path("hat.png").await?;
//!     let accepted = client.submit_image(&upload).await?;
//!
//!     println!("Submitted task: {}", accepted.task_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod health;
mod service;
mod tasks;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use service::JobService;

use kiln_core::dto::task::ErrorBody;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the generation service API
#[derive(Debug, Clone)]
pub struct GenerationClient {
    /// Base URL of the service (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl GenerationClient {
    /// Create a new generation client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use kiln_client::GenerationClient;
    ///
    /// let client = GenerationClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new generation client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use kiln_client::GenerationClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GenerationClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response carrying a binary body
    async fn handle_bytes_response(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;

        Ok(bytes.to_vec())
    }

    /// Turn a non-success status into an `ApiError` carrying the service's detail
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(ClientError::api_error(status.as_u16(), error_message(&body)))
    }
}

/// Extract the `detail` field of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error) => error.detail,
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
