//! Dashboard Client
//!
//! Owns the dashboard model and drives it: a polling task refreshes the
//! readouts and charts, and two write actions forward operator input to the
//! sensor server.

use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

use super::message::{MessageKind, TransientMessage};
use super::readouts::{Readouts, PLACEHOLDER};
use super::series::{ChartKind, ChartPoint, Charts, DEFAULT_HISTORY_CAPACITY};
use super::{DashboardError, DashboardEvent};
use crate::api::{ApiError, SensorApi, SensorSnapshot, ThresholdRequest};

/// Runtime settings for [`DashboardClient`]
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Time between two polls of the sensor endpoint
    pub refresh_interval: Duration,
    /// Points kept per chart
    pub history_capacity: usize,
    /// `chrono` format of chart timestamp labels
    pub time_format: String,
    /// How long the override confirmation stays visible
    pub override_message_duration: Duration,
    /// How long the save confirmation stays visible
    pub save_message_duration: Duration,
    /// Buffered events per subscriber before it starts lagging
    pub event_capacity: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(5000),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            time_format: "%H:%M:%S".to_string(),
            override_message_duration: Duration::from_millis(5000),
            save_message_duration: Duration::from_millis(3000),
            event_capacity: 64,
        }
    }
}

/// Result of one [`DashboardClient::refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot applied to readouts and charts
    Applied,
    /// A newer snapshot was already applied; this one was dropped
    Stale,
    /// Fetch or decode failed; nothing changed
    Failed,
}

/// Result of a write action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Failed,
}

/// Counters kept for diagnostics; never part of a rendered [`Frame`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub refreshes_applied: u64,
    pub refreshes_stale: u64,
    pub refreshes_failed: u64,
    pub writes_failed: u64,
    pub last_error: Option<String>,
}

/// Readouts, chart history and bookkeeping for out-of-order responses
#[derive(Debug, Clone)]
pub struct DashboardState {
    readouts: Readouts,
    charts: Charts,
    last_applied_seq: Option<u64>,
    last_timestamp: Option<DateTime<Local>>,
    stats: DashboardStats,
}

impl DashboardState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            readouts: Readouts::default(),
            charts: Charts::new(history_capacity),
            last_applied_seq: None,
            last_timestamp: None,
            stats: DashboardStats::default(),
        }
    }

    pub fn readouts(&self) -> &Readouts {
        &self.readouts
    }

    pub fn charts(&self) -> &Charts {
        &self.charts
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Apply the snapshot fetched by request `seq`.
    ///
    /// Returns `false` and changes nothing but the stale counter when a
    /// request issued later has already been applied. Chart timestamps never
    /// go backwards, even if the wall clock does.
    pub fn apply_snapshot(
        &mut self,
        seq: u64,
        snapshot: &SensorSnapshot,
        now: DateTime<Local>,
        time_format: &str,
    ) -> bool {
        if matches!(self.last_applied_seq, Some(last) if seq < last) {
            self.stats.refreshes_stale += 1;
            return false;
        }

        let timestamp = match self.last_timestamp {
            Some(previous) if previous > now => previous,
            _ => now,
        };
        let label = timestamp.format(time_format).to_string();

        self.readouts.apply(snapshot);

        for (kind, value) in [
            (ChartKind::Temperature, snapshot.temperature),
            (ChartKind::Humidity, snapshot.humidity),
            (ChartKind::TankLevel, snapshot.tank_level),
        ] {
            self.charts.get_mut(kind).push(ChartPoint {
                timestamp,
                label: label.clone(),
                value,
            });
        }

        self.last_applied_seq = Some(seq);
        self.last_timestamp = Some(timestamp);
        self.stats.refreshes_applied += 1;
        true
    }

    fn record_refresh_failure(&mut self, error: &ApiError) {
        self.stats.refreshes_failed += 1;
        self.stats.last_error = Some(error.to_string());
    }

    fn record_write_failure(&mut self, error: &ApiError) {
        self.stats.writes_failed += 1;
        self.stats.last_error = Some(error.to_string());
    }

    /// Fresh readouts and empty charts; sequence bookkeeping and stats survive
    fn reset_display(&mut self, history_capacity: usize) {
        self.readouts = Readouts::default();
        self.charts = Charts::new(history_capacity);
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub readouts: Readouts,
    pub charts: Charts,
    pub override_message: Option<String>,
    pub save_message: Option<String>,
}

/// The threshold form's two input fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThresholdForm {
    pub humidity: String,
    pub temperature: String,
}

impl ThresholdForm {
    pub fn new(humidity: impl Into<String>, temperature: impl Into<String>) -> Self {
        Self {
            humidity: humidity.into(),
            temperature: temperature.into(),
        }
    }

    /// Submit the form: exactly one threshold request, nothing else
    pub async fn submit(&self, client: &DashboardClient) -> SubmitOutcome {
        client
            .submit_thresholds(&self.humidity, &self.temperature)
            .await
    }
}

/// Polling dashboard bound to one sensor server
pub struct DashboardClient {
    api: Arc<dyn SensorApi>,
    options: DashboardOptions,
    state: RwLock<DashboardState>,
    next_seq: AtomicU64,
    override_message: TransientMessage,
    save_message: TransientMessage,
    events: broadcast::Sender<DashboardEvent>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl DashboardClient {
    /// Create a dashboard; call [`initialize`](Self::initialize) to start polling
    pub fn new(api: Arc<dyn SensorApi>, options: DashboardOptions) -> Arc<Self> {
        let (events, _) = broadcast::channel(options.event_capacity.max(1));

        Arc::new(Self {
            api,
            state: RwLock::new(DashboardState::new(options.history_capacity)),
            next_seq: AtomicU64::new(0),
            override_message: TransientMessage::new(
                MessageKind::Override,
                options.override_message_duration,
                events.clone(),
            ),
            save_message: TransientMessage::new(
                MessageKind::Save,
                options.save_message_duration,
                events.clone(),
            ),
            events,
            poller: Mutex::new(None),
            options,
        })
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    /// Subscribe to model change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Start with empty charts and poll every `refresh_interval`.
    ///
    /// The first poll happens one interval after start. Each tick runs its
    /// refresh as a separate task, so a slow response never delays the next
    /// tick.
    pub async fn initialize(self: &Arc<Self>) -> Result<(), DashboardError> {
        let mut poller = self.poller.lock().await;
        if poller.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(DashboardError::AlreadyInitialized);
        }

        self.state
            .write()
            .await
            .reset_display(self.options.history_capacity);
        for kind in ChartKind::ALL {
            let _ = self.events.send(DashboardEvent::ChartUpdated(kind));
        }

        let period = self.options.refresh_interval;
        let client = Arc::downgrade(self);
        *poller = Some(tokio::spawn(poll_loop(client, period)));

        tracing::info!(
            interval_ms = period.as_millis() as u64,
            history = self.options.history_capacity,
            "Dashboard polling started"
        );
        Ok(())
    }

    /// Stop polling, abort in-flight refreshes and hide any confirmation
    pub async fn dispose(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
            tracing::info!("Dashboard polling stopped");
        }

        self.override_message.cancel().await;
        self.save_message.cancel().await;
    }

    pub async fn is_running(&self) -> bool {
        self.poller
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Fetch one snapshot and apply it unless a newer one already was
    pub async fn refresh(&self) -> RefreshOutcome {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        match self.api.fetch_snapshot().await {
            Ok(snapshot) => {
                let applied = self.state.write().await.apply_snapshot(
                    seq,
                    &snapshot,
                    Local::now(),
                    &self.options.time_format,
                );

                if !applied {
                    tracing::debug!(seq, "Discarding stale sensor snapshot");
                    return RefreshOutcome::Stale;
                }

                let _ = self.events.send(DashboardEvent::ReadoutsUpdated);
                for kind in ChartKind::ALL {
                    let _ = self.events.send(DashboardEvent::ChartUpdated(kind));
                }

                tracing::debug!(
                    seq,
                    temperature = snapshot.temperature,
                    humidity = snapshot.humidity,
                    tank_level = snapshot.tank_level,
                    "Sensor snapshot applied"
                );
                RefreshOutcome::Applied
            }
            Err(e) => {
                tracing::error!(seq, error = %e, "Error fetching sensor data");
                self.state.write().await.record_refresh_failure(&e);
                let _ = self.events.send(DashboardEvent::RefreshFailed);
                RefreshOutcome::Failed
            }
        }
    }

    /// Force the system decision; shows the override confirmation on success
    pub async fn submit_override(&self, action: &str) -> SubmitOutcome {
        match self.api.submit_override(action).await {
            Ok(response) => {
                let decision = response.new_decision;
                self.state
                    .write()
                    .await
                    .readouts
                    .set_decision(decision.as_deref());
                let _ = self.events.send(DashboardEvent::ReadoutsUpdated);

                let shown = decision.as_deref().unwrap_or(PLACEHOLDER);
                self.override_message
                    .show(format!("System Override: {}", shown))
                    .await;

                tracing::info!(action, decision = shown, "Override accepted");
                SubmitOutcome::Accepted
            }
            Err(e) => {
                tracing::error!(action, error = %e, "Error overriding decision");
                self.state.write().await.record_write_failure(&e);
                SubmitOutcome::Failed
            }
        }
    }

    /// Send new thresholds as typed; shows the save confirmation on success
    pub async fn submit_thresholds(&self, humidity: &str, temperature: &str) -> SubmitOutcome {
        let request = ThresholdRequest::new(humidity, temperature);

        match self.api.submit_thresholds(&request).await {
            Ok(_) => {
                self.save_message.show("Thresholds saved").await;
                tracing::info!(humidity, temperature, "Thresholds saved");
                SubmitOutcome::Accepted
            }
            Err(e) => {
                tracing::error!(humidity, temperature, error = %e, "Error saving thresholds");
                self.state.write().await.record_write_failure(&e);
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn readouts(&self) -> Readouts {
        self.state.read().await.readouts.clone()
    }

    pub async fn charts(&self) -> Charts {
        self.state.read().await.charts.clone()
    }

    pub async fn stats(&self) -> DashboardStats {
        self.state.read().await.stats.clone()
    }

    /// Text of a confirmation message, `None` while hidden
    pub async fn message(&self, kind: MessageKind) -> Option<String> {
        match kind {
            MessageKind::Override => self.override_message.text().await,
            MessageKind::Save => self.save_message.text().await,
        }
    }

    /// Consistent copy of the whole model for rendering
    pub async fn frame(&self) -> Frame {
        let (readouts, charts) = {
            let state = self.state.read().await;
            (state.readouts.clone(), state.charts.clone())
        };

        Frame {
            readouts,
            charts,
            override_message: self.override_message.text().await,
            save_message: self.save_message.text().await,
        }
    }
}

async fn poll_loop(client: Weak<DashboardClient>, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Dropping the set (on abort) cancels refreshes still in flight
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let Some(client) = client.upgrade() else {
                    break;
                };
                in_flight.spawn(async move {
                    client.refresh().await;
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    tracing::debug!("Dashboard dropped, polling loop exiting");
}
