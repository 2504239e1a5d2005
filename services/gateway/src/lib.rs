//! AgriPredict gateway
//!
//! HTTP surface of the prediction service.
//! Features:
//! - JSON prediction API with a uniform `status` envelope
//! - Browser forms rendering text reports and a statistics chart
//! - Per-district registration logs
//! - Request logging, CORS, compression and Prometheus metrics

#![allow(missing_docs)]

use anyhow::Result;

pub mod append_log;
pub mod chart;
pub mod config;
pub mod dispatcher;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pages;
pub mod payload;
pub mod report;
pub mod server;
pub mod utils;

pub use append_log::AppendLog;
pub use config::{CorsConfig, GatewayConfig, MonitoringConfig, ServerConfig};
pub use dispatcher::Dispatcher;
pub use server::AgriPredictServer;

/// Start the gateway server
pub async fn start_server(config: GatewayConfig) -> Result<()> {
    let server = AgriPredictServer::new(config)?;
    server.start().await
}
