//! Sensor Server REST Client
//!
//! HTTP client for the sensor server's JSON API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{LinkStatus, OverrideResponse, SavingsEstimate, SensorSnapshot, ThresholdRequest};
use super::error::{ApiError, ApiResult};
use super::SensorApi;

pub const SENSOR_DATA_PATH: &str = "/api/sensor-data";
pub const OVERRIDE_PATH: &str = "/api/override";
pub const THRESHOLDS_PATH: &str = "/api/set-thresholds";
pub const SAVINGS_PATH: &str = "/api/savings";
pub const LINK_STATUS_PATH: &str = "/api/mqtt-status";

/// Configuration for [`SensorClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Per-request timeout; `None` waits for as long as the server takes
    pub request_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: None,
        }
    }
}

/// reqwest-backed implementation of [`SensorApi`]
#[derive(Debug, Clone)]
pub struct SensorClient {
    client: Client,
    base_url: String,
}

impl SensorClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build().map_err(ApiError::Transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a JSON body regardless of the HTTP status.
    ///
    /// The server reports its own errors as JSON; whether that is usable is
    /// decided by the target type, not the status line.
    async fn read_json<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "Server returned non-success status");
        }

        let body = response.bytes().await.map_err(ApiError::from_send)?;
        serde_json::from_slice(&body).map_err(|e| ApiError::decode(path, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(ApiError::from_send)?;

        Self::read_json(path, response).await
    }
}

#[async_trait]
impl SensorApi for SensorClient {
    async fn fetch_snapshot(&self) -> ApiResult<SensorSnapshot> {
        self.get_json(SENSOR_DATA_PATH).await
    }

    async fn submit_override(&self, action: &str) -> ApiResult<OverrideResponse> {
        let response = self
            .client
            .get(self.url(OVERRIDE_PATH))
            .query(&[("decision", action)])
            .send()
            .await
            .map_err(ApiError::from_send)?;

        Self::read_json(OVERRIDE_PATH, response).await
    }

    async fn submit_thresholds(&self, request: &ThresholdRequest) -> ApiResult<serde_json::Value> {
        let response = self
            .client
            .post(self.url(THRESHOLDS_PATH))
            .json(request)
            .send()
            .await
            .map_err(ApiError::from_send)?;

        Self::read_json(THRESHOLDS_PATH, response).await
    }

    async fn fetch_savings(&self) -> ApiResult<SavingsEstimate> {
        self.get_json(SAVINGS_PATH).await
    }

    async fn fetch_link_status(&self) -> ApiResult<LinkStatus> {
        self.get_json(LINK_STATUS_PATH).await
    }
}
