//! Gateway server implementation

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::{Html, Json},
    routing::{get, post},
};
use ml_inference::ModelRegistry;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    append_log::AppendLog,
    config::GatewayConfig,
    dispatcher::Dispatcher,
    handlers::{
        CatalogHandlers, HealthHandlers, PageHandlers, PredictHandlers, forms::FormBody,
        predict::JsonBody,
    },
    metrics::GatewayMetrics,
    middleware::{create_cors_layer, logging_middleware},
    models::{
        ApiResponse, CropsResponse, DemandEstimate, DistrictsResponse, FertilizerResponse,
        HealthResponse, ModelsStatusResponse, PriceEstimate, ProductionEstimate,
        RecommendationResponse,
    },
    pages::FormPage,
};

/// Unified application state containing all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub health_handlers: HealthHandlers,
    pub catalog_handlers: CatalogHandlers,
    pub predict_handlers: PredictHandlers,
    pub page_handlers: PageHandlers,
}

/// Gateway server
#[derive(Debug)]
pub struct AgriPredictServer {
    config: GatewayConfig,
    dispatcher: Arc<Dispatcher>,
    metrics: GatewayMetrics,
}

impl AgriPredictServer {
    /// Create the server from configuration
    ///
    /// Installs the metrics recorder when enabled, then preloads artifacts
    /// when `storage.preload_on_startup` is set.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        info!("Initializing AgriPredict gateway");

        let metrics = if config.monitoring.metrics_enabled {
            GatewayMetrics::install()?
        } else {
            GatewayMetrics::disabled()
        };

        let registry = Arc::new(ModelRegistry::from_config(&config.storage));
        if config.storage.preload_on_startup {
            let loaded = registry.preload_all();
            if loaded == 0 {
                warn!(
                    model_dir = %config.storage.model_dir.display(),
                    "No model artifacts loaded; predictions will report models as unavailable"
                );
            } else {
                info!(loaded, "Model artifacts preloaded");
            }
        }

        Ok(Self::with_registry(config, registry, metrics))
    }

    /// Create the server around an existing registry
    #[must_use]
    pub fn with_registry(
        config: GatewayConfig,
        registry: Arc<ModelRegistry>,
        metrics: GatewayMetrics,
    ) -> Self {
        let log = Arc::new(AppendLog::from_config(&config.storage));
        Self {
            dispatcher: Arc::new(Dispatcher::new(registry, log)),
            config,
            metrics,
        }
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .server_address()
            .parse()
            .with_context(|| format!("invalid server address '{}'", self.config.server_address()))?;

        let app = self.router();
        info!("Application routes and middleware configured successfully");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind to address {addr}"))?;
        info!("AgriPredict gateway listening on {}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("Server encountered a fatal error: {}", e);
            return Err(anyhow::anyhow!("Server error: {}", e));
        }

        Ok(())
    }

    /// Create the Axum application with all routes and middleware
    pub fn router(&self) -> Router {
        let registry = Arc::clone(self.dispatcher.registry());
        let app_state = AppState {
            health_handlers: HealthHandlers::new(Arc::clone(&registry), self.metrics.clone()),
            catalog_handlers: CatalogHandlers::new(registry),
            predict_handlers: PredictHandlers::new(Arc::clone(&self.dispatcher)),
            page_handlers: PageHandlers::new(Arc::clone(&self.dispatcher)),
        };

        let mut app = Router::new()
            // Browser pages
            .route("/", get(index))
            .route("/cropyield", get(|| async { PageHandlers::form(FormPage::CropYield) }))
            .route("/cropregistration", get(|| async { PageHandlers::form(FormPage::CropRegistration) }))
            .route("/currentstatistics", get(|| async { PageHandlers::form(FormPage::CurrentStatistics) }))
            .route("/recommendfile", get(|| async { PageHandlers::form(FormPage::Recommend) }))
            .route("/fertilizersfile", get(|| async { PageHandlers::form(FormPage::Fertilizers) }))
            .route("/estimation", post(estimation))
            .route("/registration", post(registration))
            .route("/statistics", post(statistics))
            .route("/recommend", post(recommend))
            .route("/fertilizers", post(fertilizers))
            // Catalog
            .route("/api/crops/available", get(available_crops))
            .route("/api/districts/available", get(available_districts))
            .route("/api/models/status", get(models_status))
            // Predictions
            .route("/api/predict/production", post(predict_production))
            .route("/api/predict/price", post(predict_price))
            .route("/api/predict/demand", post(predict_demand))
            .route("/api/predict/fertilizer", post(predict_fertilizer))
            .route("/api/predict/recommendation", post(predict_recommendation))
            // Health and monitoring
            .route("/api/health", get(health_check))
            .route(&self.config.monitoring.metrics_path, get(metrics))
            .with_state(app_state)
            .layer(DefaultBodyLimit::max(self.config.server.max_body_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.server.timeout_seconds),
            ))
            .layer(middleware::from_fn(logging_middleware))
            .layer(TraceLayer::new_for_http());

        if self.config.server.compression {
            app = app.layer(CompressionLayer::new());
        }
        if self.config.cors.enabled {
            app = app.layer(create_cors_layer(&self.config.cors));
        }

        info!("AgriPredict routes configured successfully");
        app
    }
}

// Handler wrapper functions to work with unified state
async fn index() -> Html<String> {
    PageHandlers::index().await
}

async fn estimation(State(state): State<AppState>, body: FormBody) -> Html<String> {
    PageHandlers::estimation(State(state.page_handlers), body).await
}

async fn registration(State(state): State<AppState>, body: FormBody) -> Html<String> {
    PageHandlers::registration(State(state.page_handlers), body).await
}

async fn statistics(State(state): State<AppState>, body: FormBody) -> Html<String> {
    PageHandlers::statistics(State(state.page_handlers), body).await
}

async fn recommend(State(state): State<AppState>, body: FormBody) -> Html<String> {
    PageHandlers::recommend(State(state.page_handlers), body).await
}

async fn fertilizers(State(state): State<AppState>, body: FormBody) -> Html<String> {
    PageHandlers::fertilizers(State(state.page_handlers), body).await
}

async fn available_crops(State(state): State<AppState>) -> Json<ApiResponse<CropsResponse>> {
    CatalogHandlers::available_crops(State(state.catalog_handlers)).await
}

async fn available_districts() -> Json<ApiResponse<DistrictsResponse>> {
    CatalogHandlers::available_districts().await
}

async fn models_status(State(state): State<AppState>) -> Json<ApiResponse<ModelsStatusResponse>> {
    CatalogHandlers::models_status(State(state.catalog_handlers)).await
}

async fn predict_production(
    State(state): State<AppState>,
    body: JsonBody,
) -> Json<ApiResponse<ProductionEstimate>> {
    PredictHandlers::production(State(state.predict_handlers), body).await
}

async fn predict_price(State(state): State<AppState>, body: JsonBody) -> Json<ApiResponse<PriceEstimate>> {
    PredictHandlers::price(State(state.predict_handlers), body).await
}

async fn predict_demand(State(state): State<AppState>, body: JsonBody) -> Json<ApiResponse<DemandEstimate>> {
    PredictHandlers::demand(State(state.predict_handlers), body).await
}

async fn predict_fertilizer(
    State(state): State<AppState>,
    body: JsonBody,
) -> Json<ApiResponse<FertilizerResponse>> {
    PredictHandlers::fertilizer(State(state.predict_handlers), body).await
}

async fn predict_recommendation(
    State(state): State<AppState>,
    body: JsonBody,
) -> Json<ApiResponse<RecommendationResponse>> {
    PredictHandlers::recommendation(State(state.predict_handlers), body).await
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    HealthHandlers::health_check(State(state.health_handlers)).await
}

async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    HealthHandlers::metrics(State(state.health_handlers)).await
}

/// API route documentation
pub fn print_routes() {
    println!("AgriPredict Routes:");
    println!("===================");
    println!();
    println!("Browser:");
    println!("  GET  /                         - Landing page");
    println!("  GET  /cropyield                - Estimation form");
    println!("  GET  /cropregistration         - Registration form");
    println!("  GET  /currentstatistics        - Statistics form");
    println!("  GET  /recommendfile            - Crop recommendation form");
    println!("  GET  /fertilizersfile          - Fertilizer recommendation form");
    println!("  POST /estimation               - Production, price and demand report");
    println!("  POST /registration             - Register a crop");
    println!("  POST /statistics               - Registered production vs demand");
    println!("  POST /recommend                - Crop recommendation report");
    println!("  POST /fertilizers              - Fertilizer recommendation report");
    println!();
    println!("Catalog:");
    println!("  GET  /api/crops/available      - Supported crops");
    println!("  GET  /api/districts/available  - Supported districts");
    println!("  GET  /api/models/status        - Loaded models per family");
    println!();
    println!("Predictions:");
    println!("  POST /api/predict/production     - Expected yield");
    println!("  POST /api/predict/price          - Price and revenue");
    println!("  POST /api/predict/demand         - Regional demand");
    println!("  POST /api/predict/fertilizer     - Fertilizer recommendation");
    println!("  POST /api/predict/recommendation - Crop recommendation");
    println!();
    println!("Health & Monitoring:");
    println!("  GET  /api/health               - Health check");
    println!("  GET  /metrics                  - Prometheus metrics");
    println!();
    println!("All JSON endpoints answer HTTP 200 with a status field.");
}
