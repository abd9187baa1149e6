//! Background workers for network calls and the channel they report on.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::api::{self, HealthError, HealthReport, PredictError};
use crate::features::FeatureSet;

/// Span shared by everything logged about one submission, on either thread.
pub(super) fn submission_span(submission: u64) -> tracing::Span {
    tracing::info_span!("submission", id = submission)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub(super) enum JobMessage {
    HealthChecked(Result<HealthReport, HealthError>),
    PredictionSettled {
        submission: u64,
        result: Result<f64, PredictError>,
    },
}

pub(super) struct ClientJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    health_check_started: bool,
    health_check_in_progress: bool,
    prediction_in_progress: bool,
    submissions: u64,
}

impl ClientJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = mpsc::channel();
        Self {
            message_tx,
            message_rx,
            health_check_started: false,
            health_check_in_progress: false,
            prediction_in_progress: false,
            submissions: 0,
        }
    }

    /// Start the health check unless one was ever started; returns whether it started.
    pub(super) fn begin_health_check(&mut self, base_url: String, timeout: Duration) -> bool {
        if self.health_check_started {
            return false;
        }
        self.health_check_started = true;
        self.health_check_in_progress = true;
        let tx = self.message_tx.clone();
        let span = tracing::info_span!("health_check", base_url = %base_url);
        thread::spawn(move || {
            let _entered = span.entered();
            let started = Instant::now();
            let result = api::health(&base_url, timeout);
            tracing::debug!(
                elapsed_ms = elapsed_ms(started),
                ok = result.is_ok(),
                "Health check finished"
            );
            let _ = tx.send(JobMessage::HealthChecked(result));
        });
        true
    }

    pub(super) fn clear_health_check(&mut self) {
        self.health_check_in_progress = false;
    }

    pub(super) fn prediction_in_progress(&self) -> bool {
        self.prediction_in_progress
    }

    /// Start a prediction request and return its submission number.
    pub(super) fn begin_prediction(
        &mut self,
        base_url: String,
        features: Arc<FeatureSet>,
        timeout: Duration,
    ) -> u64 {
        self.submissions += 1;
        let submission = self.submissions;
        self.prediction_in_progress = true;
        let tx = self.message_tx.clone();
        let span = submission_span(submission);
        thread::spawn(move || {
            let _entered = span.entered();
            let started = Instant::now();
            let result = api::predict(&base_url, &features, timeout);
            tracing::debug!(
                elapsed_ms = elapsed_ms(started),
                ok = result.is_ok(),
                "Request finished"
            );
            let _ = tx.send(JobMessage::PredictionSettled { submission, result });
        });
        submission
    }

    pub(super) fn clear_prediction(&mut self) {
        self.prediction_in_progress = false;
    }

    pub(super) fn has_pending(&self) -> bool {
        self.prediction_in_progress || self.health_check_in_progress
    }

    pub(super) fn try_recv(&self) -> Option<JobMessage> {
        match self.message_rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub(super) fn recv_timeout(&self, timeout: Duration) -> Option<JobMessage> {
        match self.message_rx.recv_timeout(timeout) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}
