use std::time::Duration;

use serde::Deserialize;

use super::{HEALTH_PATH, HealthError, endpoint};
use crate::http_client;

const MAX_HEALTH_RESPONSE_BYTES: usize = 16 * 1024;
const HEALTHY_STATUS: &str = "healthy";

/// Parsed body of `GET /api/health`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_loaded: Option<bool>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY_STATUS
    }
}

/// Ask the backend once whether it is up.
///
/// Any status below 500 is read as a body and judged by its `status` field;
/// 5xx, transport failures and unreadable bodies are errors.
pub fn health(base_url: &str, timeout: Duration) -> Result<HealthReport, HealthError> {
    let url = endpoint(base_url, HEALTH_PATH);
    let response = match http_client::agent().get(&url).timeout(timeout).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) if code >= 500 => {
            return Err(HealthError::Server(code));
        }
        Err(ureq::Error::Status(_, response)) => response,
        Err(ureq::Error::Transport(transport)) => {
            if http_client::is_timeout(&transport) {
                return Err(HealthError::Timeout);
            }
            return Err(HealthError::Transport(transport.to_string()));
        }
    };
    let body = http_client::read_body_limited(response, MAX_HEALTH_RESPONSE_BYTES)
        .map_err(HealthError::InvalidResponse)?;
    serde_json::from_str::<HealthReport>(body.trim())
        .map_err(|err| HealthError::InvalidResponse(err.to_string()))
}
