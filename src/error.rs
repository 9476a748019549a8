use thiserror::Error;

/// Failure to retrieve a single path from the content host.
///
/// Always recoverable: callers skip the affected document and carry on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("could not decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("transport error for {path}: {reason}")]
    Transport { path: String, reason: String },

    #[error("timed out fetching {0}")]
    Timeout(String),

    /// The host refused the request for good (authentication, permissions, validation)
    #[error("request for {path} rejected with status {status}")]
    Rejected { path: String, status: u16 },
}

impl RetrievalError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout(_))
    }
}

/// Input rejected before any remote call is made
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search query must not be empty")]
    EmptyQuery,
}
