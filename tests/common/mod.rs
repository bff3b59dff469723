#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use tokio::sync::Notify;
use widget_engine::{
    errors::{WidgetError, WidgetResult},
    live::{config::SyncConfig, source::StatusSource, status::StatusPayload},
};

/// Scriptable status source. `None` answers fail like an unreachable endpoint.
#[derive(Default)]
pub struct MockSource {
    status: Mutex<Option<StatusPayload>>,
    fallback: Mutex<Option<String>>,
    gate: Option<Arc<Notify>>,
    status_calls: AtomicUsize,
    fallback_calls: AtomicUsize,
}

impl MockSource {
    pub fn answering(status: StatusPayload) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(Some(status)),
            ..Self::default()
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every status fetch waits for one `notify_one` on the returned gate.
    pub fn gated(status: StatusPayload) -> (Arc<Self>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(Self {
            status: Mutex::new(Some(status)),
            gate: Some(gate.clone()),
            ..Self::default()
        });
        (source, gate)
    }

    pub fn set_status(&self, status: Option<StatusPayload>) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_fallback(&self, text: Option<&str>) {
        *self.fallback.lock().unwrap() = text.map(str::to_string);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn fallback_calls(&self) -> usize {
        self.fallback_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for MockSource {
    async fn fetch_status(&self) -> WidgetResult<StatusPayload> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let status = self.status.lock().unwrap().clone();
        status.ok_or_else(|| WidgetError::empty_body("mock://status"))
    }

    async fn fetch_fallback_text(&self) -> WidgetResult<String> {
        self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        let text = self.fallback.lock().unwrap().clone();
        text.ok_or_else(|| WidgetError::empty_body("mock://attack.txt"))
    }
}

pub fn sync_config(attacks: &[&str]) -> SyncConfig {
    SyncConfig {
        status_endpoint: "mock://status".to_string(),
        fallback_text_endpoint: "mock://attack.txt".to_string(),
        poll_interval_ms: 1000,
        local_tick_interval_ms: 200,
        default_attack_list: attacks.iter().map(|a| a.to_string()).collect(),
        event_deadline: None,
        event_label: "FIGHT NIGHT".to_string(),
        pinned_attack: None,
    }
}

pub fn looping() -> StatusPayload {
    StatusPayload {
        is_looping: Some(true),
        ..StatusPayload::default()
    }
}

pub fn stopped_on(attack: &str) -> StatusPayload {
    StatusPayload {
        is_looping: Some(false),
        selected_attack_on_stop: Some(attack.to_string()),
        ..StatusPayload::default()
    }
}
