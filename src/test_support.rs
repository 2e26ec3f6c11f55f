//! In-process stand-in for the sensor server, used by unit tests.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::{
    LINK_STATUS_PATH, OVERRIDE_PATH, SAVINGS_PATH, SENSOR_DATA_PATH, THRESHOLDS_PATH,
};

pub const DEFAULT_SNAPSHOT: &str = r#"{
    "temperature": 12.5,
    "humidity": 81,
    "rainfall": true,
    "tank_level": 64.2,
    "hvac_load": 47.5,
    "system_decision": "Reduce HVAC cooling & store rainwater",
    "time": 14,
    "month": 10
}"#;

#[derive(Default)]
struct Shared {
    hits: Mutex<HashMap<&'static str, usize>>,
    snapshot_body: Mutex<String>,
    override_body: Mutex<String>,
    last_override: Mutex<Option<String>>,
    threshold_bodies: Mutex<Vec<String>>,
}

impl Shared {
    fn hit(&self, path: &'static str) {
        *self.hits.lock().unwrap().entry(path).or_insert(0) += 1;
    }
}

/// Mock sensor server listening on an ephemeral localhost port
pub struct MockServer {
    addr: std::net::SocketAddr,
    shared: Arc<Shared>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        *shared.snapshot_body.lock().unwrap() = DEFAULT_SNAPSHOT.to_string();
        *shared.override_body.lock().unwrap() = r#"{"new_decision": "Cooling"}"#.to_string();

        let app = Router::new()
            .route(SENSOR_DATA_PATH, get(sensor_data))
            .route(OVERRIDE_PATH, get(override_decision))
            .route(THRESHOLDS_PATH, post(set_thresholds))
            .route(SAVINGS_PATH, get(savings))
            .route(LINK_STATUS_PATH, get(link_status))
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            shared,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self, path: &'static str) -> usize {
        self.shared.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.shared.hits.lock().unwrap().values().sum()
    }

    pub async fn set_snapshot_body(&self, body: &str) {
        *self.shared.snapshot_body.lock().unwrap() = body.to_string();
    }

    pub async fn set_override_body(&self, body: &str) {
        *self.shared.override_body.lock().unwrap() = body.to_string();
    }

    pub async fn last_override(&self) -> Option<String> {
        self.shared.last_override.lock().unwrap().clone()
    }

    pub async fn threshold_bodies(&self) -> Vec<String> {
        self.shared.threshold_bodies.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// URL of a localhost port nothing is listening on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn sensor_data(State(shared): State<Arc<Shared>>) -> Response {
    shared.hit(SENSOR_DATA_PATH);
    let body = shared.snapshot_body.lock().unwrap().clone();
    json_body(body)
}

async fn override_decision(
    State(shared): State<Arc<Shared>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    shared.hit(OVERRIDE_PATH);
    *shared.last_override.lock().unwrap() = params.get("decision").cloned();
    let body = shared.override_body.lock().unwrap().clone();
    json_body(body)
}

async fn set_thresholds(State(shared): State<Arc<Shared>>, body: String) -> Response {
    shared.hit(THRESHOLDS_PATH);
    shared.threshold_bodies.lock().unwrap().push(body);
    json_body(r#"{"status": "success"}"#.to_string())
}

async fn savings(State(shared): State<Arc<Shared>>) -> Response {
    shared.hit(SAVINGS_PATH);
    json_body(
        r#"{"energy_savings_kwh": 10.5, "water_savings_liters": 20.0, "efficiency_gain": "15.0%"}"#
            .to_string(),
    )
}

async fn link_status(State(shared): State<Arc<Shared>>) -> Response {
    shared.hit(LINK_STATUS_PATH);
    json_body(r#"{"status": "Connected"}"#.to_string())
}

/// Tracing layer that records the level of every event it sees
#[derive(Clone, Default)]
pub struct LevelCounter {
    levels: Arc<Mutex<Vec<tracing::Level>>>,
}

impl LevelCounter {
    pub fn count(&self, level: tracing::Level) -> usize {
        self.levels.lock().unwrap().iter().filter(|l| **l == level).count()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LevelCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.levels.lock().unwrap().push(*event.metadata().level());
    }
}
