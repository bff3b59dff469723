use serde::{Deserialize, Serialize};

use super::easing::Easing;

/// When a counter starts sweeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerMode {
    /// Starts as soon as the card is mounted.
    Immediate,
    /// Starts the first time the card is visible at or above the threshold.
    OnVisible,
}

/// Immutable per-card animation configuration.
///
/// Field names follow the persisted editor format (`duration`,
/// `triggerOnScroll`, `threshold`) so stored widgets load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationSpec {
    pub start_value: f64,
    pub end_value: f64,
    /// Milliseconds; zero or negative completes instantly.
    #[serde(rename = "duration")]
    pub duration_ms: i64,
    pub easing: Easing,
    pub decimal_places: u32,
    pub prefix: String,
    pub suffix: String,
    #[serde(rename = "triggerOnScroll", with = "trigger_flag")]
    pub trigger_mode: TriggerMode,
    #[serde(rename = "threshold")]
    pub visibility_threshold: f64,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            start_value: 0.0,
            end_value: 100.0,
            duration_ms: 2000,
            easing: Easing::EaseOut,
            decimal_places: 0,
            prefix: String::new(),
            suffix: String::new(),
            trigger_mode: TriggerMode::OnVisible,
            visibility_threshold: 0.3,
        }
    }
}

impl AnimationSpec {
    /// Degenerate specs complete on the first trigger instead of animating.
    pub fn is_instant(&self) -> bool {
        self.duration_ms <= 0 || !self.start_value.is_finite() || !self.end_value.is_finite()
    }

    /// Threshold clamped to [0, 1]; NaN falls back to the editor default.
    pub fn threshold(&self) -> f64 {
        if self.visibility_threshold.is_nan() {
            0.3
        } else {
            self.visibility_threshold.clamp(0.0, 1.0)
        }
    }
}

mod trigger_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TriggerMode;

    pub fn serialize<S: Serializer>(mode: &TriggerMode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(matches!(mode, TriggerMode::OnVisible))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TriggerMode, D::Error> {
        let on_scroll = bool::deserialize(deserializer)?;
        Ok(if on_scroll {
            TriggerMode::OnVisible
        } else {
            TriggerMode::Immediate
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_persisted_editor_record() {
        let json = r#"{
            "startValue": 0,
            "endValue": 54000,
            "duration": 2000,
            "easing": "easeOut",
            "decimalPlaces": 0,
            "prefix": "$",
            "suffix": "",
            "triggerOnScroll": false,
            "threshold": 0.3
        }"#;
        let spec: AnimationSpec = serde_json::from_str(json).unwrap();

        assert_eq!(spec.end_value, 54000.0);
        assert_eq!(spec.duration_ms, 2000);
        assert_eq!(spec.trigger_mode, TriggerMode::Immediate);
        assert_eq!(spec.prefix, "$");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let spec: AnimationSpec = serde_json::from_str(r#"{"endValue": 7}"#).unwrap();
        assert_eq!(spec.end_value, 7.0);
        assert_eq!(spec.duration_ms, 2000);
        assert_eq!(spec.easing, Easing::EaseOut);
        assert_eq!(spec.trigger_mode, TriggerMode::OnVisible);
    }

    #[test]
    fn writes_trigger_as_scroll_flag() {
        let spec = AnimationSpec {
            trigger_mode: TriggerMode::OnVisible,
            ..AnimationSpec::default()
        };
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["triggerOnScroll"], serde_json::json!(true));
        assert_eq!(value["duration"], serde_json::json!(2000));
    }

    #[test]
    fn invalid_duration_is_instant() {
        let zero = AnimationSpec {
            duration_ms: 0,
            ..AnimationSpec::default()
        };
        let negative = AnimationSpec {
            duration_ms: -50,
            ..AnimationSpec::default()
        };
        let nan = AnimationSpec {
            end_value: f64::NAN,
            ..AnimationSpec::default()
        };
        assert!(zero.is_instant());
        assert!(negative.is_instant());
        assert!(nan.is_instant());
        assert!(!AnimationSpec::default().is_instant());
    }
}
