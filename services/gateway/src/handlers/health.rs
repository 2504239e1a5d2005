//! Health check and monitoring handlers

use std::sync::Arc;

use agripredict_common::{CROPS, ModelFamily, STATUS_HEALTHY, STATUS_INITIALIZING};
use axum::{extract::State, http::StatusCode, response::Json};
use ml_inference::{ModelKey, ModelRegistry};
use tracing::debug;

use crate::{metrics::GatewayMetrics, models::HealthResponse};

/// Health check handlers
#[derive(Debug, Clone)]
pub struct HealthHandlers {
    registry: Arc<ModelRegistry>,
    metrics: GatewayMetrics,
}

impl HealthHandlers {
    pub const fn new(registry: Arc<ModelRegistry>, metrics: GatewayMetrics) -> Self {
        Self { registry, metrics }
    }

    /// Health check endpoint
    ///
    /// Healthy once any production model is cached or its artifact exists.
    /// `models_loaded` counts cached production models only.
    pub async fn health_check(State(handlers): State<Self>) -> Json<HealthResponse> {
        let models_loaded = handlers.registry.loaded_count(ModelFamily::Production);
        let ready = models_loaded > 0
            || CROPS.iter().any(|crop| {
                handlers
                    .registry
                    .artifact_present(ModelKey::for_crop(ModelFamily::Production, crop))
            });
        debug!(models_loaded, ready, "Health check");

        Json(HealthResponse {
            status: if ready { STATUS_HEALTHY } else { STATUS_INITIALIZING },
            models_loaded,
        })
    }

    /// Prometheus metrics endpoint
    pub async fn metrics(State(handlers): State<Self>) -> Result<String, StatusCode> {
        handlers.metrics.render().ok_or(StatusCode::NOT_FOUND)
    }
}
