use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::{WidgetError, WidgetResult};

use super::{
    config::SyncConfig,
    status::{StatusPayload, StatusUpdate},
};

/// Where the live widget reads its authoritative state from.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Primary JSON status endpoint.
    async fn fetch_status(&self) -> WidgetResult<StatusPayload>;

    /// Secondary plain-text endpoint carrying only the current attack.
    async fn fetch_fallback_text(&self) -> WidgetResult<String>;
}

pub struct HttpStatusSource {
    http_client: reqwest::Client,
    status_endpoint: String,
    fallback_text_endpoint: String,
}

impl HttpStatusSource {
    pub fn new(http_client: reqwest::Client, config: &SyncConfig) -> Self {
        Self {
            http_client,
            status_endpoint: config.status_endpoint.clone(),
            fallback_text_endpoint: config.fallback_text_endpoint.clone(),
        }
    }

    async fn get(&self, endpoint: &str) -> WidgetResult<reqwest::Response> {
        let response = self
            .http_client
            .get(endpoint)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> WidgetResult<StatusPayload> {
        let response = self.get(&self.status_endpoint).await?;
        let payload = response.json::<StatusPayload>().await?;
        Ok(payload)
    }

    async fn fetch_fallback_text(&self) -> WidgetResult<String> {
        let response = self.get(&self.fallback_text_endpoint).await?;
        let text = response.text().await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WidgetError::empty_body(&self.fallback_text_endpoint));
        }
        Ok(trimmed.to_string())
    }
}

/// Primary endpoint first, then the plain-text fallback.
///
/// `None` means both failed; the caller keeps its last-known-good state.
pub async fn fetch_update(source: &dyn StatusSource) -> Option<StatusUpdate> {
    match source.fetch_status().await {
        Ok(payload) => return Some(payload.into()),
        Err(e) if e.is_transport() => debug!("status endpoint failed, trying fallback: {}", e),
        Err(e) => warn!("status endpoint failed, trying fallback: {}", e),
    }

    match source.fetch_fallback_text().await {
        Ok(text) => Some(StatusUpdate::from_fallback_text(&text)),
        Err(e) => {
            debug!("fallback text endpoint failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    struct Scripted {
        status: Option<StatusPayload>,
        fallback: Option<String>,
        fallback_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl StatusSource for Scripted {
        async fn fetch_status(&self) -> WidgetResult<StatusPayload> {
            self.status
                .clone()
                .ok_or_else(|| WidgetError::empty_body("status"))
        }

        async fn fetch_fallback_text(&self) -> WidgetResult<String> {
            self.fallback_calls.fetch_add(1, Ordering::SeqCst);
            self.fallback
                .clone()
                .ok_or_else(|| WidgetError::empty_body("fallback"))
        }
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Scripted {
            status: Some(StatusPayload {
                is_looping: Some(false),
                selected_attack_on_stop: Some("ARMBAR".to_string()),
                ..Default::default()
            }),
            fallback: Some("KIMURA".to_string()),
            fallback_calls: calls.clone(),
        };

        let update = fetch_update(&source).await.expect("update");
        assert_eq!(update.is_looping, Some(false));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_failure_uses_fallback_text() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Scripted {
            status: None,
            fallback: Some("KIMURA".to_string()),
            fallback_calls: calls.clone(),
        };

        let update = fetch_update(&source).await.expect("fallback update");
        assert_eq!(update.is_looping, Some(true));
        assert_eq!(update.current_attack.as_deref(), Some("KIMURA"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn both_failing_yields_none() {
        let source = Scripted {
            status: None,
            fallback: None,
            fallback_calls: Arc::new(AtomicUsize::new(0)),
        };
        assert!(fetch_update(&source).await.is_none());
    }

    #[tokio::test]
    async fn unreachable_http_endpoints_are_absorbed() {
        let config = SyncConfig {
            status_endpoint: "http://127.0.0.1:9/status".to_string(),
            fallback_text_endpoint: "http://127.0.0.1:9/attack.txt".to_string(),
            poll_interval_ms: 1000,
            local_tick_interval_ms: 200,
            default_attack_list: vec!["A".to_string()],
            event_deadline: None,
            event_label: String::new(),
            pinned_attack: None,
        };
        let source = HttpStatusSource::new(reqwest::Client::new(), &config);
        assert!(fetch_update(&source).await.is_none());
    }
}
