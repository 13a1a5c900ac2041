//! Tank request submission backends.
//!
//! The form only talks to [`TankRequestService`]. Without a configured endpoint
//! the dashboard uses [`SimulatedTankRequestService`], a fixed-latency stand-in.

use crate::config::Config;
use crate::requests::models::TankRequest;
use anyhow::{Context, Result};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Reasons a submission can fail.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Request never got a response
    #[error("Could not reach the request service: {0}")]
    Transport(#[from] reqwest::Error),
    /// Service answered with a non-success status
    #[error("Request service rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Asynchronous sink for tank requests.
pub trait TankRequestService: Send + Sync + 'static {
    /// Submit one request.
    ///
    /// # Arguments
    /// * `request` - Validated request
    ///
    /// # Returns
    /// * `Result<(), SubmitError>` - Success or the reason it failed
    fn submit(&self, request: &TankRequest) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

/// Stand-in service that waits a fixed delay and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedTankRequestService {
    delay: Duration,
}

impl SimulatedTankRequestService {
    /// Create a simulated service with the given latency.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl TankRequestService for SimulatedTankRequestService {
    async fn submit(&self, request: &TankRequest) -> Result<(), SubmitError> {
        tracing::debug!(
            location = %request.location,
            delay_ms = self.delay.as_millis() as u64,
            "simulating tank request"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Service that POSTs requests as JSON to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTankRequestService {
    /// HTTP client for requests
    client: Client,
    /// Full URL requests are posted to
    endpoint: String,
}

impl HttpTankRequestService {
    /// Create an HTTP service.
    ///
    /// # Arguments
    /// * `endpoint` - URL to POST requests to
    ///
    /// # Returns
    /// * `Result<HttpTankRequestService>` - New service or error
    pub fn new(endpoint: &str) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(anyhow::anyhow!("Request endpoint must not be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim().to_string(),
        })
    }
}

impl TankRequestService for HttpTankRequestService {
    async fn submit(&self, request: &TankRequest) -> Result<(), SubmitError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Backend selected from configuration.
#[derive(Debug, Clone)]
pub enum RequestBackend {
    Simulated(SimulatedTankRequestService),
    Http(HttpTankRequestService),
}

impl RequestBackend {
    /// Pick the backend for a configuration.
    ///
    /// # Details
    /// Uses HTTP when `request_endpoint` is set, otherwise the simulated service
    /// with `submit_delay_ms` latency.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.request_endpoint.as_deref() {
            Some(endpoint) => Ok(Self::Http(HttpTankRequestService::new(endpoint)?)),
            None => Ok(Self::Simulated(SimulatedTankRequestService::new(
                config.submit_delay(),
            ))),
        }
    }
}

impl TankRequestService for RequestBackend {
    async fn submit(&self, request: &TankRequest) -> Result<(), SubmitError> {
        match self {
            RequestBackend::Simulated(service) => service.submit(request).await,
            RequestBackend::Http(service) => service.submit(request).await,
        }
    }
}
