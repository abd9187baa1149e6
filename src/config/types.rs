use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults::{
    clamp_timeout_ms, default_base_url, default_health_timeout_ms, default_request_timeout_ms,
};
use super::errors::ConfigError;
use crate::features::{FeatureName, FeatureSet};

/// Settings the prediction client is constructed with.
///
/// Config keys: `base_url`, `request_timeout_ms`, `health_timeout_ms`, and an
/// optional `[features]` table of starting values keyed by feature name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline for a prediction request, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Deadline for the health check, in milliseconds.
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,
    /// Starting feature values that replace the built-in samples.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<FeatureName, f64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            health_timeout_ms: default_health_timeout_ms(),
            features: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Use the given backend URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.normalized()
    }

    /// Trim the URL and clamp timeouts into a usable range.
    pub fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        self.request_timeout_ms = clamp_timeout_ms(self.request_timeout_ms);
        self.health_timeout_ms = clamp_timeout_ms(self.health_timeout_ms);
        self
    }

    /// Reject URLs that are not absolute http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let parsed = url::Url::parse(&self.base_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "unsupported scheme '{}', expected http or https",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        Ok(())
    }

    /// The feature set a fresh client starts with.
    pub fn initial_features(&self) -> FeatureSet {
        FeatureSet::with_overrides(&self.features)
    }

    /// Apply the backend URL environment override, if set.
    pub fn apply_env(self) -> Self {
        match std::env::var(super::BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => self.with_base_url(url),
            _ => self,
        }
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }

    pub fn health_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.health_timeout_ms)
    }
}
