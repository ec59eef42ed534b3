use thiserror::Error;

/// Outcome of a single fetch that did not succeed. Carried inside
/// [`FetchResult::Failure`](crate::FetchResult), so it stays cheap to clone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("while reading {url}: {reason}")]
    BodyRead { url: String, reason: String },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("cancelled")]
    Cancelled,

    #[error("timeout after {0} ms")]
    Timeout(u64),

    #[error("task panicked: {0}")]
    Panicked(String),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::BodyRead { .. } => true,
            FetchError::Status(code) => *code >= 500,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
