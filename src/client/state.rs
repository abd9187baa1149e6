//! Snapshot of what the user currently sees.

use crate::api::PredictError;

/// Backend reachability as reported by the one-shot health check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Check not settled yet (or never started).
    #[default]
    Checking,
    /// The backend answered `healthy`.
    Connected,
    /// The check failed or the backend reported anything else.
    Disconnected,
}

impl Connectivity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Where a single submission is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Request and connectivity state. Replaced wholesale on every change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestState {
    /// A prediction request is outstanding.
    pub is_submitting: bool,
    /// Failure of the last completed submission.
    pub last_error: Option<PredictError>,
    /// Raw value returned by the last successful submission.
    pub last_prediction: Option<f64>,
    pub connectivity: Connectivity,
    /// Whether the backend reported a loaded model, when it said so.
    pub model_loaded: Option<bool>,
}

impl RequestState {
    /// The error as the message shown to the user.
    pub fn last_error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }

    pub fn phase(&self) -> SubmissionPhase {
        if self.is_submitting {
            SubmissionPhase::Submitting
        } else if self.last_prediction.is_some() {
            SubmissionPhase::Succeeded
        } else if self.last_error.is_some() {
            SubmissionPhase::Failed
        } else {
            SubmissionPhase::Idle
        }
    }

    /// State at the start of a submission: previous outcome cleared.
    pub(super) fn submitting(&self) -> Self {
        Self {
            is_submitting: true,
            last_error: None,
            last_prediction: None,
            ..self.clone()
        }
    }

    /// State after a submission settles; exactly one outcome is set.
    pub(super) fn settled(&self, result: Result<f64, PredictError>) -> Self {
        let (last_prediction, last_error) = match result {
            Ok(value) => (Some(value), None),
            Err(err) => (None, Some(err)),
        };
        Self {
            is_submitting: false,
            last_error,
            last_prediction,
            ..self.clone()
        }
    }

    pub(super) fn with_connectivity(
        &self,
        connectivity: Connectivity,
        model_loaded: Option<bool>,
    ) -> Self {
        Self {
            connectivity,
            model_loaded,
            ..self.clone()
        }
    }
}
