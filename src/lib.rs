//! # Aethernet
//!
//! Live dashboard client for an HVAC and rainwater-harvesting sensor server.
//!
//! ## Features
//!
//! - **Polling**: fetches a sensor snapshot every 5 seconds
//! - **Rolling charts**: bounded temperature, humidity and tank level history
//! - **Operator actions**: decision overrides and threshold updates
//! - **Ordered updates**: late responses never overwrite newer readings
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for the sensor server
//! - [`dashboard`]: Dashboard model, polling loop and write actions
//! - [`view`]: Terminal rendering
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aethernet::api::{ClientConfig, SensorClient};
//! use aethernet::dashboard::{DashboardClient, DashboardOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = SensorClient::new(ClientConfig::default())?;
//!     let dashboard = DashboardClient::new(Arc::new(api), DashboardOptions::default());
//!
//!     dashboard.initialize().await?;
//!     dashboard.submit_override("store").await;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(30)).await;
//!     println!("{:?}", dashboard.readouts().await);
//!
//!     dashboard.dispose().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod view;

#[cfg(test)]
mod test_support;

// Re-export top-level types for convenience
pub use api::{
    ApiError, ApiResult, ClientConfig, LinkStatus, OverrideResponse, SavingsEstimate, SensorApi,
    SensorClient, SensorSnapshot, ThresholdRequest,
};

pub use dashboard::{
    ChartKind, ChartSeries, DashboardClient, DashboardError, DashboardEvent, DashboardOptions,
    Frame, MessageKind, ReadoutId, Readouts, RefreshOutcome, SubmitOutcome, ThresholdForm,
};

pub use config::{Config, ConfigError, DashboardConfig, Discovery, LoggingConfig, ServerConfig};

pub use view::TerminalView;
