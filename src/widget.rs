use std::time::Duration;

use actix::{Actor, Addr};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    animation::{AnimationSpec, CounterFrame, Easing, TriggerMode},
    counter::{messages::Dispose, CounterCard},
    errors::{WidgetError, WidgetResult},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub animation: AnimationSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Counter-card dashboard as stored by the editor.
///
/// Style and layout sections of the stored record are not modelled here and
/// are dropped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub id: String,
    pub name: String,
    pub cards: Vec<CardData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn sample_card(id: &str, title: &str, end_value: f64, decimals: u32, prefix: &str, suffix: &str) -> CardData {
    CardData {
        id: id.to_string(),
        label: String::new(),
        title: title.to_string(),
        description: String::new(),
        animation: AnimationSpec {
            start_value: 0.0,
            end_value,
            duration_ms: 2000,
            easing: Easing::EaseOut,
            decimal_places: decimals,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            trigger_mode: TriggerMode::Immediate,
            visibility_threshold: 0.3,
        },
        background_image: None,
        icon: None,
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: "widget-1".to_string(),
            name: "My Counter Widget".to_string(),
            cards: vec![
                sample_card("card-1", "Total Revenue", 54000.0, 0, "$", ""),
                sample_card("card-2", "Active Users", 12500.0, 0, "", "+"),
                sample_card("card-3", "Growth Rate", 127.0, 1, "", "%"),
            ],
            api_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of the remote values API: `{ "cards": [{ "endValue": 123 }, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteValues {
    #[serde(default)]
    pub cards: Vec<RemoteCardValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCardValue {
    #[serde(default)]
    pub end_value: Option<f64>,
}

impl WidgetConfig {
    /// Applies remote end values by card position. Returns how many cards
    /// changed; a changed spec starts a fresh animation run on next launch.
    pub fn apply_remote_values(&mut self, values: &RemoteValues) -> usize {
        let mut changed = 0;
        for (card, remote) in self.cards.iter_mut().zip(values.cards.iter()) {
            let Some(end_value) = remote.end_value.filter(|v| v.is_finite()) else {
                continue;
            };
            if card.animation.end_value != end_value {
                card.animation.end_value = end_value;
                changed += 1;
            }
        }
        if changed > 0 {
            self.updated_at = Utc::now();
        }
        changed
    }
}

/// Reads remote card values. Only HTTPS sources are accepted.
pub async fn fetch_remote_values(
    http_client: &reqwest::Client,
    api_url: &str,
) -> WidgetResult<RemoteValues> {
    if !api_url.starts_with("https://") {
        return Err(WidgetError::insecure_url(api_url));
    }
    let response = http_client.get(api_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(WidgetError::UnexpectedStatus {
            endpoint: api_url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.json::<RemoteValues>().await?)
}

/// One running counter per card of a widget.
pub struct CounterBoard {
    cards: Vec<(String, Addr<CounterCard>, watch::Receiver<CounterFrame>)>,
}

impl CounterBoard {
    /// Must be called from within a running actix system.
    pub fn launch(config: &WidgetConfig, frame_interval: Duration) -> Self {
        let cards = config
            .cards
            .iter()
            .map(|card| {
                let (actor, receiver) =
                    CounterCard::new(card.id.clone(), card.animation.clone(), frame_interval);
                (card.id.clone(), actor.start(), receiver)
            })
            .collect::<Vec<_>>();
        info!(widget_id = %config.id, cards = cards.len(), "counter board launched");
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, card_id: &str) -> Option<&Addr<CounterCard>> {
        self.cards
            .iter()
            .find(|(id, _, _)| id == card_id)
            .map(|(_, addr, _)| addr)
    }

    pub fn frames(&self) -> impl Iterator<Item = (&str, watch::Receiver<CounterFrame>)> {
        self.cards
            .iter()
            .map(|(id, _, receiver)| (id.as_str(), receiver.clone()))
    }

    pub fn dispose(self) {
        for (id, addr, _) in self.cards {
            if !addr.connected() {
                warn!(card_id = %id, "counter card already stopped");
                continue;
            }
            addr.do_send(Dispose);
        }
    }
}
