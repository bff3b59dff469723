use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{errors::WidgetResult, widget::WidgetConfig};

/// Flat JSON file holding the single saved counter widget.
#[derive(Debug, Clone)]
pub struct WidgetStore {
    path: PathBuf,
}

impl WidgetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files load as `None`, the caller falls back to
    /// defaults.
    pub async fn load(&self) -> Option<WidgetConfig> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!("no stored widget at {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<WidgetConfig>(&raw) {
            Ok(widget) => Some(widget),
            Err(e) => {
                warn!("stored widget at {} is invalid: {}", self.path.display(), e);
                None
            }
        }
    }

    pub async fn save(&self, widget: &WidgetConfig) -> WidgetResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_string_pretty(widget)?;
        tokio::fs::write(&self.path, body).await?;
        info!(widget_id = %widget.id, "widget saved to {}", self.path.display());
        Ok(())
    }
}
