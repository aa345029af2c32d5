use bytes::Bytes;
use http::StatusCode;
use thiserror::Error;

/// Who produced a rejected response, from the `x-genstream-error-source` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    /// The relay itself (validation, deadline, internal failure).
    Relay,
    /// The generative backend behind the relay.
    Upstream,
    /// Header absent or unrecognised.
    Unknown,
}

impl std::fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Relay => "relay",
            Self::Upstream => "upstream",
            Self::Unknown => "unknown",
        })
    }
}

/// Errors produced while calling the relay and reconstructing its document.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Client build error: {0}")]
    BuildError(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// The relay answered with an error status; no frame was ever sent.
    #[error("Request rejected before streaming: status={status}, source={origin}")]
    Preflight {
        status: StatusCode,
        origin: ErrorSource,
        body: Bytes,
    },

    /// The stream ended, or broke, before the completion sentinel.
    #[error(
        "Stream truncated after {frames} frames: {}",
        .cause.as_deref().unwrap_or("no completion sentinel")
    )]
    TruncatedStream {
        frames: usize,
        cause: Option<String>,
    },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// The stream completed but the reconstructed text is not the expected JSON document.
    #[error("Malformed document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl ClientError {
    /// `true` when the request failed before any frame was produced and may be retried as is.
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::Preflight { .. } | Self::Connection(_) | Self::BuildError(_)
        )
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedStream { .. })
    }
}
