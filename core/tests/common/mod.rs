#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use escoba_core::api::{
    Dispatcher, Replayer, SessionController, SessionEvent, SimulateRequest, SimulationBackend,
    SimulationResult, TransportError,
};
use serde_json::json;
use tokio::sync::{broadcast, Notify};

/// Two-event game used across tests: a capture followed by a table-changing play.
pub fn scenario_result() -> SimulationResult {
    serde_json::from_value(json!({
        "game_log": [
            {"event": "immediate_capture", "player": "P1", "cards": ["7H", "7C"]},
            {"player": "P2", "action": "play", "played_card": "3D", "table_after": ["3D"]}
        ],
        "final_scores": {"P1": 2, "P2": 0}
    }))
    .expect("scenario result decodes")
}

pub fn events_result(count: usize) -> SimulationResult {
    let log: Vec<_> = (0..count)
        .map(|i| json!({"player": format!("P{}", i % 2 + 1), "action": "play"}))
        .collect();
    serde_json::from_value(json!({
        "game_log": log,
        "final_scores": {"P1": 0, "P2": 0}
    }))
    .expect("events result decodes")
}

/// One narrated play followed by the given `final_scores` object.
pub fn scores_result(final_scores: serde_json::Value) -> SimulationResult {
    serde_json::from_value(json!({
        "game_log": [{"player": "P1", "action": "play"}],
        "final_scores": final_scores
    }))
    .expect("scores result decodes")
}

/// Answers every request with the same reply; optionally holds each request
/// until [`FakeBackend::release`] is called.
pub struct FakeBackend {
    reply: Result<SimulationResult, TransportError>,
    gate: Option<Notify>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<String>>>,
}

impl FakeBackend {
    pub fn replying(reply: Result<SimulationResult, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            gate: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn gated(reply: Result<SimulationResult, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            gate: Some(Notify::new()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SimulationBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn simulate(
        &self,
        request: &SimulateRequest<'_>,
    ) -> Result<SimulationResult, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.models.to_vec());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.reply.clone()
    }
}

pub fn controller(backend: Arc<FakeBackend>) -> SessionController {
    SessionController::new(
        Dispatcher::new(backend),
        Replayer::new(Duration::from_millis(1500)),
        Duration::from_secs(1),
    )
}

/// Receive until `pred` matches, returning the matching event.
pub async fn wait_for<F>(rx: &mut broadcast::Receiver<SessionEvent>, mut pred: F) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    loop {
        let event = rx.recv().await.expect("session channel open");
        if pred(&event) {
            return event;
        }
    }
}

pub fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
