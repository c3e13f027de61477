use thiserror::Error;

/// Session store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted session is half-written or unparsable. Callers reset to
    /// a clean unauthenticated state instead of surfacing this.
    #[error("stored session is corrupt")]
    Corrupt,
}

/// Errors surfaced by the client API and session layers.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("config error: {0}")]
    Config(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a failure status. Carries the parsed response
    /// body (when one exists) so UIs can show server-supplied messages.
    #[error("request failed ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },
    #[error("response error: {0}")]
    Parse(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ClientError {
    /// Message suitable for direct display, preferring the server's words.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
