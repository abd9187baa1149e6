//! The prediction client: feature edits, the one-shot health check, and
//! price requests with their outcome.
//!
//! Network calls run on worker threads and report back over a channel. The
//! caller drives the client by calling [`PredictionClient::poll`] (or
//! [`PredictionClient::block_until_settled`]), which applies finished jobs to
//! the state snapshot.

mod jobs;
mod state;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{ClientConfig, ConfigError};
use crate::features::{FeatureName, FeatureSet};

use jobs::{ClientJobs, JobMessage};
pub use state::{Connectivity, RequestState, SubmissionPhase};

/// Why a submission was not started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("A prediction request is already in flight")]
    AlreadyInFlight,
}

/// Feature store, health checkr and prediction requester in one unit.
pub struct PredictionClient {
    config: ClientConfig,
    features: Arc<FeatureSet>,
    state: RequestState,
    jobs: ClientJobs,
}

impl PredictionClient {
    /// Build a client; the configuration is normalized and validated first.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let config = config.normalized();
        config.validate()?;
        let features = Arc::new(config.initial_features());
        Ok(Self {
            config,
            features,
            state: RequestState::default(),
            jobs: ClientJobs::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current feature snapshot. Later edits never change a returned value.
    pub fn features(&self) -> Arc<FeatureSet> {
        Arc::clone(&self.features)
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Store raw input for one feature; unusable input becomes zero.
    pub fn set_feature(&mut self, name: FeatureName, raw: &str) {
        let next = self.features.with_input(name, raw);
        tracing::debug!("{name} = {}", next.get(name));
        self.features = Arc::new(next);
    }

    /// Call `/api/health` once for the lifetime of this client.
    ///
    /// Returns whether a check was started. Failures only flip connectivity
    /// to disconnected.
    pub fn check_health(&mut self) -> bool {
        let started = self
            .jobs
            .begin_health_check(self.config.base_url.clone(), self.config.health_timeout());
        if started {
            tracing::debug!("Checking backend health at {}", self.config.base_url);
        } else {
            tracing::debug!("Health check already ran; ignoring repeat request");
        }
        started
    }

    /// Send the current features for a price estimate.
    ///
    /// The previous outcome is cleared before the request leaves. A second
    /// call while a request is outstanding is rejected and changes nothing.
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        if self.state.is_submitting || self.jobs.prediction_in_progress() {
            tracing::debug!("Submission rejected; a request is already in flight");
            return Err(SubmitError::AlreadyInFlight);
        }
        self.state = self.state.submitting();
        let submission = self.jobs.begin_prediction(
            self.config.base_url.clone(),
            self.features(),
            self.config.request_timeout(),
        );
        let _entered = jobs::submission_span(submission).entered();
        tracing::info!("Requesting prediction from {}", self.config.base_url);
        Ok(())
    }

    /// Apply every finished job without blocking; returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(message) = self.jobs.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    /// Wait until no submission is outstanding and a started health check has settled.
    ///
    /// Returns `false` if `limit` elapsed first.
    pub fn block_until_settled(&mut self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        self.poll();
        while self.jobs.has_pending() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            if let Some(message) = self.jobs.recv_timeout(deadline - now) {
                self.apply(message);
            }
        }
        true
    }

    fn apply(&mut self, message: JobMessage) {
        match message {
            JobMessage::HealthChecked(result) => {
                self.jobs.clear_health_check();
                self.apply_health(result);
            }
            JobMessage::PredictionSettled { submission, result } => {
                self.jobs.clear_prediction();
                let _entered = jobs::submission_span(submission).entered();
                match &result {
                    Ok(value) => tracing::info!("Prediction received: {value}"),
                    Err(err) => tracing::warn!(kind = ?err.kind(), "{err}"),
                }
                self.state = self.state.settled(result);
            }
        }
    }

    fn apply_health(
        &mut self,
        result: Result<crate::api::HealthReport, crate::api::HealthError>,
    ) {
        let (connectivity, model_loaded) = match result {
            Ok(report) if report.is_healthy() => {
                if report.model_loaded == Some(false) {
                    tracing::warn!("Backend is up but reports no loaded model");
                }
                (Connectivity::Connected, report.model_loaded)
            }
            Ok(report) => {
                tracing::warn!("Backend reported status '{}'", report.status);
                (Connectivity::Disconnected, report.model_loaded)
            }
            Err(err) => {
                tracing::warn!("Backend health check failed: {err}");
                (Connectivity::Disconnected, None)
            }
        };
        tracing::info!("Backend {}", connectivity.label());
        self.state = self.state.with_connectivity(connectivity, model_loaded);
    }
}
