//! Prometheus metrics for the gateway
//!
//! Metrics are always emitted through the `metrics` facade. They are only
//! collected when a recorder is installed, which the server does when
//! `monitoring.metrics_enabled` is set.

use std::time::Duration;

use agripredict_common::ModelFamily;
use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Gateway metrics collector
#[derive(Clone, Default)]
pub struct GatewayMetrics {
    handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for GatewayMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayMetrics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl GatewayMetrics {
    /// Install the process-wide Prometheus recorder
    pub fn install() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install Prometheus recorder")?;
        Self::register_metrics();
        Ok(Self {
            handle: Some(handle),
        })
    }

    /// No recorder; the metrics endpoint reports nothing
    #[must_use]
    pub const fn disabled() -> Self {
        Self { handle: None }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }

    /// Prometheus text exposition
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }

    fn register_metrics() {
        // HTTP Request Metrics
        describe_counter!(
            "agripredict_http_requests_total",
            "Total number of HTTP requests by method and status"
        );
        describe_histogram!(
            "agripredict_http_request_duration_seconds",
            "HTTP request duration in seconds"
        );

        // Model Metrics
        describe_counter!(
            "agripredict_predictions_total",
            "Predictions by model family and outcome"
        );
        describe_counter!(
            "agripredict_model_loads_total",
            "Artifact load attempts by model family and outcome"
        );
        describe_gauge!("agripredict_models_cached", "Models held by the registry");

        // Business Metrics
        describe_counter!(
            "agripredict_registrations_total",
            "Crop registrations by outcome"
        );
    }
}

/// Record a completed HTTP request
pub fn record_request(method: &str, status: u16, duration: Duration) {
    counter!(
        "agripredict_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "agripredict_http_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a prediction attempt
pub fn record_prediction(family: ModelFamily, outcome: &'static str) {
    counter!(
        "agripredict_predictions_total",
        "family" => family.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a registration attempt
pub fn record_registration(outcome: &'static str) {
    counter!("agripredict_registrations_total", "outcome" => outcome).increment(1);
}
