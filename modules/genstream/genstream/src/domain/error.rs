use thiserror::Error;

/// Failure of a single relay operation. None of these are fatal to the process.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The incoming request is missing a required field.
    #[error("{detail}")]
    Validation { detail: String },

    /// The backend answered the generation request with a non-2xx status.
    #[error("upstream rejected the generation request with status {status}")]
    UpstreamRejected { status: u16, detail: String },

    /// The backend could not be reached (DNS, connect, TLS).
    #[error("upstream unreachable: {detail}")]
    UpstreamUnavailable { detail: String },

    /// The upstream body failed after the stream was opened.
    #[error("upstream stream failed: {detail}")]
    MidStream { detail: String },

    /// The end-to-end deadline of the relay operation elapsed.
    #[error("relay deadline of {secs}s exceeded")]
    DeadlineExceeded { secs: u64 },

    #[error("internal relay error: {message}")]
    Internal { message: String },
}

impl RelayError {
    /// `true` when the failure happened before the upstream started streaming.
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::UpstreamRejected { .. } | Self::UpstreamUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_classification() {
        assert!(
            RelayError::UpstreamRejected {
                status: 500,
                detail: String::new(),
            }
            .is_preflight()
        );
        assert!(
            RelayError::UpstreamUnavailable {
                detail: "connection refused".into(),
            }
            .is_preflight()
        );
        assert!(
            !RelayError::MidStream {
                detail: "reset".into(),
            }
            .is_preflight()
        );
        assert!(!RelayError::DeadlineExceeded { secs: 1 }.is_preflight());
    }

    #[test]
    fn rejected_message_carries_status() {
        let err = RelayError::UpstreamRejected {
            status: 503,
            detail: "model loading".into(),
        };
        assert_eq!(
            err.to_string(),
            "upstream rejected the generation request with status 503"
        );
    }
}
