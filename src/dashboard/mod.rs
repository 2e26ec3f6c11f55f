//! Live Dashboard
//!
//! Polls the sensor server on a fixed cadence and keeps the dashboard model
//! (six readouts, three rolling charts, two confirmation messages) current.
//!
//! ## Architecture
//!
//! - **DashboardClient**: owns the model, the polling task and the write actions
//! - **Charts**: bounded series for temperature, humidity and tank level
//! - **Readouts**: formatted text of the latest snapshot
//! - **TransientMessage**: self-hiding override/save confirmations
//!
//! Every model change is announced as a [`DashboardEvent`] on a broadcast
//! channel; renderers subscribe and redraw.
//!
//! ## Failure policy
//!
//! Failed calls are logged and otherwise ignored. The last good display stays
//! up and the next timer tick tries again.

mod client;
mod message;
mod readouts;
mod series;

pub use client::{
    DashboardClient, DashboardOptions, DashboardState, DashboardStats, Frame, RefreshOutcome,
    SubmitOutcome, ThresholdForm,
};
pub use message::{MessageKind, TransientMessage};
pub use readouts::{ReadoutId, Readouts, PLACEHOLDER};
pub use series::{ChartKind, ChartPoint, ChartSeries, ChartSpec, Charts, DEFAULT_HISTORY_CAPACITY};

use thiserror::Error;

/// Model change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// One or more readouts changed
    ReadoutsUpdated,
    /// A point was appended to a chart; redraw it
    ChartUpdated(ChartKind),
    MessageShown(MessageKind),
    MessageHidden(MessageKind),
    /// A refresh failed; the display was left untouched
    RefreshFailed,
}

/// Dashboard lifecycle errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Dashboard is already running")]
    AlreadyInitialized,
}
