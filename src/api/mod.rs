//! HTTP contract with the prediction backend.
//!
//! Two endpoints are used: `GET /api/health` for a liveness check and
//! `POST /api/predict` for a price estimate. Every failure is mapped onto a
//! single error value that renders as the message shown to the user.

mod error;
mod health;
mod predict;

pub use error::{HealthError, PredictError, PredictErrorKind};
pub use health::{HealthReport, health};
pub use predict::{PredictRequest, predict};

pub(crate) const HEALTH_PATH: &str = "/api/health";
pub(crate) const PREDICT_PATH: &str = "/api/predict";

const UNKNOWN_ERROR: &str = "Unknown error";

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Pull a non-blank `error` field out of a JSON object body; other bodies are
/// reported as their raw text.
fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(message) = value
            .get("error")
            .and_then(|error| error.as_str())
            .map(str::trim)
            .filter(|message| !message.is_empty())
        {
            return message.to_string();
        }
        if value.is_object() {
            return UNKNOWN_ERROR.to_string();
        }
    }
    if trimmed.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        trimmed.to_string()
    }
}
