use thiserror::Error;

use crate::http_client;

/// Outcome buckets a failed submission falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictErrorKind {
    /// The server answered but did not return a prediction.
    BusinessFailure,
    /// The configured deadline expired.
    TransportTimeout,
    /// No response was received at all.
    TransportNetworkError,
    /// A response arrived with a non-2xx status.
    TransportServerError,
    /// The request could not be built or the answer could not be read.
    UnknownClientError,
}

/// A failed prediction request, rendered as the user-facing message.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PredictError {
    #[error("Prediction failed: {0}")]
    Rejected(String),
    #[error("Request timed out after {timeout_ms} ms - the server might be slow to respond")]
    Timeout { timeout_ms: u64 },
    #[error("Server error: {status} - {detail}")]
    Server { status: u16, detail: String },
    #[error(
        "Network error - could not reach the backend at {base_url} ({reason}); \
         check that it is running and reachable"
    )]
    Network { base_url: String, reason: String },
    #[error("{0}")]
    Client(String),
}

impl PredictError {
    pub fn kind(&self) -> PredictErrorKind {
        match self {
            Self::Rejected(_) => PredictErrorKind::BusinessFailure,
            Self::Timeout { .. } => PredictErrorKind::TransportTimeout,
            Self::Server { .. } => PredictErrorKind::TransportServerError,
            Self::Network { .. } => PredictErrorKind::TransportNetworkError,
            Self::Client(_) => PredictErrorKind::UnknownClientError,
        }
    }

    /// Map a `ureq` failure onto exactly one bucket.
    pub(super) fn from_ureq(
        err: ureq::Error,
        base_url: &str,
        timeout_ms: u64,
        max_body_bytes: usize,
    ) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let detail = match http_client::read_response_bytes(response, max_body_bytes) {
                    Ok(bytes) => super::error_detail(&String::from_utf8_lossy(&bytes)),
                    Err(err) if http_client::is_timeout_io(&err) => {
                        return Self::Timeout { timeout_ms };
                    }
                    Err(err) => err.to_string(),
                };
                Self::Server { status, detail }
            }
            ureq::Error::Transport(transport) => {
                if http_client::is_timeout(&transport) {
                    return Self::Timeout { timeout_ms };
                }
                match transport.kind() {
                    ureq::ErrorKind::InvalidUrl
                    | ureq::ErrorKind::UnknownScheme
                    | ureq::ErrorKind::InsecureRequestHttpsOnly
                    | ureq::ErrorKind::InvalidProxyUrl => Self::Client(transport.to_string()),
                    _ => Self::Network {
                        base_url: base_url.to_string(),
                        reason: transport.to_string(),
                    },
                }
            }
        }
    }
}

/// A failed health check. Only ever logged; connectivity reflects it.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("Health check timed out")]
    Timeout,
    #[error("Health endpoint returned HTTP {0}")]
    Server(u16),
    #[error("Health check transport error: {0}")]
    Transport(String),
    #[error("Invalid health response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_its_bucket() {
        let cases = [
            (
                PredictError::Rejected("x".into()),
                PredictErrorKind::BusinessFailure,
            ),
            (
                PredictError::Timeout { timeout_ms: 10 },
                PredictErrorKind::TransportTimeout,
            ),
            (
                PredictError::Server {
                    status: 500,
                    detail: "x".into(),
                },
                PredictErrorKind::TransportServerError,
            ),
            (
                PredictError::Network {
                    base_url: "http://h".into(),
                    reason: "x".into(),
                },
                PredictErrorKind::TransportNetworkError,
            ),
            (
                PredictError::Client("x".into()),
                PredictErrorKind::UnknownClientError,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn client_error_message_is_verbatim() {
        let err = PredictError::Client("Bad URL: nope".to_string());
        assert_eq!(err.to_string(), "Bad URL: nope");
    }
}
