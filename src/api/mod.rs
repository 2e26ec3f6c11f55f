//! Sensor Server API
//!
//! Client side of the sensor server's HTTP contract.
//!
//! # Endpoints
//!
//! - `GET /api/sensor-data` - Latest sensor snapshot
//! - `GET /api/override?decision=<action>` - Force a system decision
//! - `POST /api/set-thresholds` - Update humidity/temperature thresholds
//! - `GET /api/savings` - Estimated energy and water savings
//! - `GET /api/mqtt-status` - Telemetry broker link status
//!
//! Response bodies are parsed whatever the HTTP status is: the server reports
//! its own failures as JSON, and a body that does not fit the expected shape
//! surfaces as [`ApiError::Decode`].

mod client;
pub mod dto;
pub mod error;

pub use client::{
    ClientConfig, SensorClient, LINK_STATUS_PATH, OVERRIDE_PATH, SAVINGS_PATH, SENSOR_DATA_PATH,
    THRESHOLDS_PATH,
};
pub use dto::{LinkStatus, OverrideResponse, SavingsEstimate, SensorSnapshot, ThresholdRequest};
pub use error::{ApiError, ApiResult};

use async_trait::async_trait;

/// Operations the dashboard needs from the sensor server
#[async_trait]
pub trait SensorApi: Send + Sync {
    /// Fetch the latest readings
    async fn fetch_snapshot(&self) -> ApiResult<SensorSnapshot>;

    /// Force the system decision to `action` (e.g. `store`, `redirect`, `clear`)
    async fn submit_override(&self, action: &str) -> ApiResult<OverrideResponse>;

    /// Store new decision thresholds; the response body is not interpreted
    async fn submit_thresholds(&self, request: &ThresholdRequest) -> ApiResult<serde_json::Value>;

    /// Fetch the server's savings estimate
    async fn fetch_savings(&self) -> ApiResult<SavingsEstimate>;

    /// Fetch the server's telemetry link status
    async fn fetch_link_status(&self) -> ApiResult<LinkStatus>;
}
