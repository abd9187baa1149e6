//! Client for a remote house-price prediction service.
/// HTTP contract and error classification.
pub mod api;
/// Application directories for config and logs.
pub mod app_dirs;
/// Prediction client state machine.
pub mod client;
/// TOML-backed client configuration.
pub mod config;
/// The thirteen model features.
pub mod features;
/// Price presentation.
pub mod format;
/// Tracing subscriber setup.
pub mod logging;

mod http_client;

#[cfg(test)]
mod test_support;

pub use client::{Connectivity, PredictionClient, RequestState, SubmissionPhase, SubmitError};
pub use config::ClientConfig;
pub use features::{FeatureName, FeatureSet};
