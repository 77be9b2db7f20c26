use thiserror::Error;

/// Failure of a single fetch. Never fatal: the caller logs it and keeps the
/// previous state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not complete (connection, TLS, timeout, body read)
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },
    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// The payload could not be decoded or lacks a required field
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

impl FetchError {
    pub fn network(url: impl ToString, err: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn malformed(url: impl ToString, err: impl std::fmt::Display) -> Self {
        Self::Malformed {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
