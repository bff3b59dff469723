use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::env::SyncSettings;

pub const DEFAULT_BJJ_ATTACKS: [&str; 12] = [
    "REAR NAKED CHOKE",
    "TRIANGLE",
    "ARMBAR",
    "GUILLOTINE",
    "HEEL HOOK",
    "KIMURA",
    "ANACONDA CHOKE",
    "DARCE CHOKE",
    "BOW & ARROW CHOKE",
    "EZEKIEL CHOKE",
    "OMOPLATA",
    "NORTH-SOUTH CHOKE",
];

pub const DEFAULT_EVENT_LABEL: &str = "SUBMISSION BONUS · FIGHT NIGHT";

pub fn default_attacks() -> Vec<String> {
    DEFAULT_BJJ_ATTACKS.iter().map(|a| a.to_string()).collect()
}

/// Immutable configuration of one live widget instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub status_endpoint: String,
    pub fallback_text_endpoint: String,
    pub poll_interval_ms: u64,
    pub local_tick_interval_ms: u64,
    pub default_attack_list: Vec<String>,
    #[serde(default)]
    pub event_deadline: Option<DateTime<Utc>>,
    #[serde(default = "default_event_label")]
    pub event_label: String,
    /// Starts in fixed mode showing this attack (the editor's "event" mode).
    #[serde(default)]
    pub pinned_attack: Option<String>,
}

fn default_event_label() -> String {
    DEFAULT_EVENT_LABEL.to_string()
}

impl SyncConfig {
    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self {
            status_endpoint: settings.status_endpoint.clone(),
            fallback_text_endpoint: settings.fallback_text_endpoint.clone(),
            poll_interval_ms: settings.poll_interval_ms,
            local_tick_interval_ms: settings.local_tick_interval_ms,
            default_attack_list: default_attacks(),
            event_deadline: settings.event_deadline,
            event_label: default_event_label(),
            pinned_attack: None,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn local_tick_interval(&self) -> Duration {
        Duration::from_millis(self.local_tick_interval_ms.max(1))
    }

    /// The configured attack list without blank names, or the built-in list
    /// if nothing usable remains.
    pub fn initial_pool(&self) -> Vec<String> {
        let pool = sanitize_attacks(&self.default_attack_list);
        if pool.is_empty() {
            default_attacks()
        } else {
            pool
        }
    }
}

pub(crate) fn sanitize_attacks(attacks: &[String]) -> Vec<String> {
    attacks
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BjjMode {
    #[default]
    Looping,
    Event,
}

/// Persisted editor record of the submission bonus widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BjjConfig {
    pub amount: String,
    pub event_label: String,
    pub mode: BjjMode,
    pub attack_name: String,
    pub attacks: Vec<String>,
}

impl Default for BjjConfig {
    fn default() -> Self {
        Self {
            amount: "$5,000".to_string(),
            event_label: default_event_label(),
            mode: BjjMode::Looping,
            attack_name: "REAR NAKED CHOKE".to_string(),
            attacks: default_attacks(),
        }
    }
}

impl BjjConfig {
    pub fn sync_config(&self, settings: &SyncSettings) -> SyncConfig {
        let pinned_attack = match self.mode {
            BjjMode::Event if !self.attack_name.trim().is_empty() => {
                Some(self.attack_name.trim().to_string())
            }
            _ => None,
        };
        SyncConfig {
            default_attack_list: self.attacks.clone(),
            event_label: self.event_label.clone(),
            pinned_attack,
            ..SyncConfig::from_settings(settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SyncSettings {
        SyncSettings {
            status_endpoint: "http://localhost/status".to_string(),
            fallback_text_endpoint: "http://localhost/attack.txt".to_string(),
            poll_interval_ms: 2000,
            local_tick_interval_ms: 200,
            event_deadline: None,
        }
    }

    #[test]
    fn blank_attack_list_falls_back_to_builtin() {
        let config = SyncConfig {
            default_attack_list: vec!["  ".to_string(), String::new()],
            ..SyncConfig::from_settings(&settings())
        };
        assert_eq!(config.initial_pool().len(), DEFAULT_BJJ_ATTACKS.len());
    }

    #[test]
    fn event_mode_pins_the_attack_name() {
        let bjj = BjjConfig {
            mode: BjjMode::Event,
            attack_name: "KIMURA".to_string(),
            ..BjjConfig::default()
        };
        let config = bjj.sync_config(&settings());
        assert_eq!(config.pinned_attack.as_deref(), Some("KIMURA"));
        assert_eq!(config.poll_interval_ms, 2000);

        let looping = BjjConfig::default().sync_config(&settings());
        assert!(looping.pinned_attack.is_none());
    }

    #[test]
    fn bjj_record_round_trips_editor_json() {
        let json = r#"{"amount":"$10,000","eventLabel":"MAIN CARD","mode":"event","attackName":"ARMBAR","attacks":["ARMBAR","KIMURA"]}"#;
        let bjj: BjjConfig = serde_json::from_str(json).unwrap();
        assert_eq!(bjj.mode, BjjMode::Event);
        assert_eq!(bjj.attacks, vec!["ARMBAR", "KIMURA"]);
    }

    #[test]
    fn intervals_never_collapse_to_zero() {
        let config = SyncConfig {
            poll_interval_ms: 0,
            local_tick_interval_ms: 0,
            ..SyncConfig::from_settings(&settings())
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(config.local_tick_interval(), Duration::from_millis(1));
    }
}
