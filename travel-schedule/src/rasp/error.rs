//! Schedule API error types.

use std::io;

/// Errors from the schedule API client.
#[derive(Debug, thiserror::Error)]
pub enum RaspError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failed below HTTP (used by non-reqwest implementations)
    #[error("transport error: {0}")]
    Transport(#[source] io::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Response body exceeded the configured cap
    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    /// Requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

impl RaspError {
    /// Whether this failure means the network is unreachable.
    ///
    /// Connectivity failures are worth retrying: the request never got a
    /// well-formed answer from the server. Everything else (bad status,
    /// undecodable body, oversized response) is a server or decoding error.
    pub fn is_connectivity(&self) -> bool {
        match self {
            RaspError::Http(e) => e.is_connect() || e.is_timeout() || chain_has_connectivity_io(e),
            RaspError::Transport(e) => is_connectivity_kind(e.kind()),
            RaspError::Json { .. }
            | RaspError::Api { .. }
            | RaspError::Unauthorized
            | RaspError::ResponseTooLarge { .. }
            | RaspError::NotFound(_) => false,
        }
    }

    /// Build a JSON error keeping a short prefix of the offending body.
    pub(crate) fn json(err: &serde_json::Error, body: &[u8]) -> Self {
        RaspError::Json {
            message: err.to_string(),
            body: Some(String::from_utf8_lossy(body).chars().take(500).collect()),
        }
    }
}

fn chain_has_connectivity_io(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<io::Error>()
            && is_connectivity_kind(io.kind())
        {
            return true;
        }
        current = e.source();
    }
    false
}

fn is_connectivity_kind(kind: io::ErrorKind) -> bool {
    use io::ErrorKind::*;
    matches!(
        kind,
        ConnectionRefused
            | ConnectionReset
            | ConnectionAborted
            | NotConnected
            | TimedOut
            | BrokenPipe
            | UnexpectedEof
            | AddrNotAvailable
            | NetworkUnreachable
            | HostUnreachable
            | NetworkDown
    )
}
