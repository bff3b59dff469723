use chrono::{DateTime, Utc};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub logging: LoggingSettings,
    pub sync: SyncSettings,
    pub animation: AnimationSettings,
    pub storage: StorageSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        println!("Loading configuration for RUN_MODE: {}", &run_mode);

        Self::from_path(&format!("config/{}", run_mode))
    }

    /// `path` is passed to `config::File::with_name`, so the `.toml`
    /// extension may be omitted.
    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Load environment-specific file (e.g., development.toml, production.toml)
            .add_source(
                File::with_name(path)
                    .format(FileFormat::Toml)
                    .required(true),
            )
            // Add environment variables (e.g., APP__SYNC__POLL_INTERVAL_MS=5000)
            .add_source(Environment::with_prefix("APP").prefix_separator("__").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub directory: String,
    pub filename: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncSettings {
    pub status_endpoint: String,
    pub fallback_text_endpoint: String,
    pub poll_interval_ms: u64,
    pub local_tick_interval_ms: u64,
    /// Wall-clock instant at which the live widget ends (RFC 3339).
    #[serde(default)]
    pub event_deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnimationSettings {
    /// Display refresh interval driving counter frames.
    pub frame_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub widget_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn loads_development_profile() {
        std::env::remove_var("APP__SYNC__POLL_INTERVAL_MS");
        let settings = Settings::from_path("config/development").expect("development.toml");

        assert_eq!(settings.sync.local_tick_interval_ms, 200);
        assert!(settings.sync.poll_interval_ms > 0);
        assert!(settings.sync.event_deadline.is_none());
        assert_eq!(settings.animation.frame_interval_ms, 16);
    }

    #[test]
    #[serial]
    fn environment_overrides_file_values() {
        std::env::set_var("APP__SYNC__POLL_INTERVAL_MS", "9000");
        let settings = Settings::from_path("config/development").expect("development.toml");
        std::env::remove_var("APP__SYNC__POLL_INTERVAL_MS");

        assert_eq!(settings.sync.poll_interval_ms, 9000);
    }

    #[test]
    #[serial]
    fn missing_profile_is_an_error() {
        assert!(Settings::from_path("config/does-not-exist").is_err());
    }
}
