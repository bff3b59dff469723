use serde::{Deserialize, Serialize};

use super::config::sanitize_attacks;

/// Body of the remote status endpoint. Every field is optional; absence
/// means "no change".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    #[serde(default)]
    pub is_looping: Option<bool>,
    #[serde(default)]
    pub current_attack: Option<String>,
    #[serde(default)]
    pub selected_attack_on_stop: Option<String>,
    #[serde(default)]
    pub attacks: Option<Vec<String>>,
    #[serde(default)]
    pub current_event: Option<ServerEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEvent {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Normalized update applied to the sync state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusUpdate {
    pub is_looping: Option<bool>,
    pub current_attack: Option<String>,
    pub selected_attack: Option<String>,
    /// `None` when absent or empty after dropping blank names.
    pub attacks: Option<Vec<String>>,
    pub event_label: Option<String>,
}

impl StatusUpdate {
    /// The plain-text endpoint is always "looping, this is the current attack".
    pub fn from_fallback_text(text: &str) -> Self {
        Self {
            is_looping: Some(true),
            current_attack: non_blank(Some(text.to_string())),
            ..Self::default()
        }
    }

    /// Text to show when entering or staying in fixed mode.
    pub fn fixed_text(&self) -> Option<&str> {
        self.selected_attack
            .as_deref()
            .or(self.current_attack.as_deref())
    }
}

impl From<StatusPayload> for StatusUpdate {
    fn from(payload: StatusPayload) -> Self {
        let attacks = payload
            .attacks
            .map(|list| sanitize_attacks(&list))
            .filter(|list| !list.is_empty());
        Self {
            is_looping: payload.is_looping,
            current_attack: non_blank(payload.current_attack),
            selected_attack: non_blank(payload.selected_attack_on_stop),
            attacks,
            event_label: non_blank(payload.current_event.and_then(|event| event.name)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_status_body() {
        let json = r#"{
            "isLooping": false,
            "currentAttack": "TRIANGLE",
            "selectedAttackOnStop": "ARMBAR",
            "attacks": ["ARMBAR", "TRIANGLE"],
            "currentEvent": {"id": 42, "name": "FIGHT NIGHT 12"}
        }"#;
        let update: StatusUpdate = serde_json::from_str::<StatusPayload>(json).unwrap().into();

        assert_eq!(update.is_looping, Some(false));
        assert_eq!(update.fixed_text(), Some("ARMBAR"));
        assert_eq!(update.attacks.as_ref().map(Vec::len), Some(2));
        assert_eq!(update.event_label.as_deref(), Some("FIGHT NIGHT 12"));
    }

    #[test]
    fn empty_object_changes_nothing() {
        let update: StatusUpdate = serde_json::from_str::<StatusPayload>("{}").unwrap().into();
        assert_eq!(update, StatusUpdate::default());
    }

    #[test]
    fn empty_or_blank_attack_lists_are_dropped() {
        let empty: StatusUpdate = serde_json::from_str::<StatusPayload>(r#"{"attacks": []}"#)
            .unwrap()
            .into();
        let blank: StatusUpdate =
            serde_json::from_str::<StatusPayload>(r#"{"attacks": ["", "  "]}"#)
                .unwrap()
                .into();
        assert!(empty.attacks.is_none());
        assert!(blank.attacks.is_none());
    }

    #[test]
    fn event_id_may_be_a_string() {
        let payload: StatusPayload =
            serde_json::from_str(r#"{"currentEvent": {"id": "evt-7", "name": "  "}}"#).unwrap();
        let update = StatusUpdate::from(payload);
        assert!(update.event_label.is_none());
    }

    #[test]
    fn fallback_text_is_trimmed_and_looping() {
        let update = StatusUpdate::from_fallback_text("  HEEL HOOK\n");
        assert_eq!(update.is_looping, Some(true));
        assert_eq!(update.current_attack.as_deref(), Some("HEEL HOOK"));
    }

    #[test]
    fn fixed_text_falls_back_to_current_attack() {
        let update = StatusUpdate {
            current_attack: Some("KIMURA".to_string()),
            ..StatusUpdate::default()
        };
        assert_eq!(update.fixed_text(), Some("KIMURA"));
    }
}
