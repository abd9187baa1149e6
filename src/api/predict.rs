use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{PREDICT_PATH, PredictError, endpoint};
use crate::features::FeatureSet;
use crate::http_client;

const MAX_PREDICT_RESPONSE_BYTES: usize = 64 * 1024;
const SUCCESS_STATUS: &str = "success";

/// Body of `POST /api/predict`.
#[derive(Clone, Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub features: &'a FeatureSet,
}

#[derive(Debug, Deserialize)]
struct PredictResponseWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    prediction: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

/// Request a price estimate for `features`.
///
/// The returned value is the backend's raw number; no rounding or range
/// check is applied here.
pub fn predict(
    base_url: &str,
    features: &FeatureSet,
    timeout: Duration,
) -> Result<f64, PredictError> {
    let url = endpoint(base_url, PREDICT_PATH);
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    let body = serde_json::to_value(PredictRequest { features })
        .map_err(|err| PredictError::Client(err.to_string()))?;
    let request = http_client::agent()
        .post(&url)
        .timeout(timeout)
        .set("Accept", "application/json");

    let response = request.send_json(body).map_err(|err| {
        PredictError::from_ureq(err, base_url, timeout_ms, MAX_PREDICT_RESPONSE_BYTES)
    })?;
    let bytes = http_client::read_response_bytes(response, MAX_PREDICT_RESPONSE_BYTES)
        .map_err(|err| {
            if http_client::is_timeout_io(&err) {
                PredictError::Timeout { timeout_ms }
            } else {
                PredictError::Client(format!("Failed to read prediction response: {err}"))
            }
        })?;
    parse_predict_response(&String::from_utf8_lossy(&bytes))
}

fn parse_predict_response(body: &str) -> Result<f64, PredictError> {
    let trimmed = body.trim();
    let parsed: PredictResponseWire = serde_json::from_str(trimmed).map_err(|err| {
        PredictError::Client(format!("Invalid prediction response: {err}: {trimmed}"))
    })?;
    if parsed.status.as_deref() != Some(SUCCESS_STATUS) {
        let message = parsed
            .error
            .filter(|error| !error.trim().is_empty())
            .unwrap_or_else(|| "the server did not return a prediction".to_string());
        return Err(PredictError::Rejected(message));
    }
    parsed.prediction.ok_or_else(|| {
        PredictError::Client("Invalid prediction response: missing numeric 'prediction'".into())
    })
}
