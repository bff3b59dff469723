use thiserror::Error;

/// Unified error types for the widget engine I/O edges.
///
/// The animation and sync cores never surface these to the presentation
/// layer; they are logged and absorbed at the actor boundary.
#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Actor mailbox error: {0}")]
    Mailbox(#[from] actix::MailboxError),

    #[error("Endpoint {endpoint} answered with status {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("Endpoint {endpoint} returned an empty body")]
    EmptyBody { endpoint: String },

    #[error("Only HTTPS URLs are allowed: {url}")]
    InsecureUrl { url: String },
}

/// Result type alias for widget engine operations
pub type WidgetResult<T> = Result<T, WidgetError>;

impl WidgetError {
    pub fn empty_body(endpoint: impl Into<String>) -> Self {
        Self::EmptyBody {
            endpoint: endpoint.into(),
        }
    }

    pub fn insecure_url(url: impl Into<String>) -> Self {
        Self::InsecureUrl { url: url.into() }
    }

    /// Transport-level failures are expected on an unattended overlay and
    /// only logged at debug level.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::EmptyBody { .. }
        )
    }
}
