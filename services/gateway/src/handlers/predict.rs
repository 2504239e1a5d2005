//! JSON prediction handlers
//!
//! Every endpoint answers HTTP 200 with the `status` envelope. Malformed
//! bodies, unknown ids and missing models all become `status: "error"`.

use std::sync::Arc;

use agripredict_common::{ServiceError, ServiceResult};
use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use ml_inference::{FertilizerReading, SoilReading};
use serde_json::Value;
use tracing::warn;

use crate::{
    dispatcher::Dispatcher,
    models::{
        ApiResponse, DemandEstimate, FertilizerParameters, FertilizerResponse, PriceEstimate,
        ProductionEstimate, RecommendationResponse,
    },
    payload::{CropRequest, FromPayload, Payload, PriceRequest, ProductionRequest},
};

/// Body extractor result; rejections are reported in the envelope
pub type JsonBody = Result<Json<Value>, JsonRejection>;

/// Parse a JSON body into a typed request
pub fn parse_json<T: FromPayload>(body: JsonBody) -> ServiceResult<T> {
    let Json(value) = body.map_err(|rejection| ServiceError::MalformedInput(rejection.body_text()))?;
    T::from_payload(&Payload::from_json(value)?)
}

/// Run a parsed request through the dispatcher off the async workers
pub async fn run_flow<R, T, F>(
    dispatcher: &Arc<Dispatcher>,
    request: ServiceResult<R>,
    flow: F,
) -> ServiceResult<T>
where
    R: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&Dispatcher, R) -> ServiceResult<T> + Send + 'static,
{
    let request = request?;
    Arc::clone(dispatcher)
        .offload(move |dispatcher| flow(dispatcher, request))
        .await
}

/// Wrap a flow result in the envelope, logging failures
pub fn respond<T>(endpoint: &'static str, result: ServiceResult<T>) -> Json<ApiResponse<T>> {
    match result {
        Ok(data) => Json(ApiResponse::success(data)),
        Err(e) => {
            warn!(endpoint, code = e.code(), error = %e, "Request rejected");
            Json(ApiResponse::error(&e))
        }
    }
}

/// Prediction handlers
#[derive(Debug, Clone)]
pub struct PredictHandlers {
    dispatcher: Arc<Dispatcher>,
}

impl PredictHandlers {
    pub const fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// `POST /api/predict/production`
    pub async fn production(
        State(handlers): State<Self>,
        body: JsonBody,
    ) -> Json<ApiResponse<ProductionEstimate>> {
        let result = run_flow(&handlers.dispatcher, parse_json::<ProductionRequest>(body), |d, request| {
            d.predict_production(&request)
        })
        .await;
        respond("production", result)
    }

    /// `POST /api/predict/price`
    pub async fn price(State(handlers): State<Self>, body: JsonBody) -> Json<ApiResponse<PriceEstimate>> {
        let result = run_flow(&handlers.dispatcher, parse_json::<PriceRequest>(body), |d, request| {
            d.predict_price(&request)
        })
        .await;
        respond("price", result)
    }

    /// `POST /api/predict/demand`
    pub async fn demand(State(handlers): State<Self>, body: JsonBody) -> Json<ApiResponse<DemandEstimate>> {
        let result = run_flow(&handlers.dispatcher, parse_json::<CropRequest>(body), |d, request| {
            d.predict_demand(&request)
        })
        .await;
        respond("demand", result)
    }

    /// `POST /api/predict/fertilizer`
    pub async fn fertilizer(
        State(handlers): State<Self>,
        body: JsonBody,
    ) -> Json<ApiResponse<FertilizerResponse>> {
        let result = run_flow(&handlers.dispatcher, parse_json::<FertilizerReading>(body), |d, reading| {
            Ok(FertilizerResponse {
                recommended_fertilizer: d.recommend_fertilizer(&reading)?,
                parameters: FertilizerParameters::from(&reading),
            })
        })
        .await;
        respond("fertilizer", result)
    }

    /// `POST /api/predict/recommendation`
    pub async fn recommendation(
        State(handlers): State<Self>,
        body: JsonBody,
    ) -> Json<ApiResponse<RecommendationResponse>> {
        let result = run_flow(&handlers.dispatcher, parse_json::<SoilReading>(body), |d, reading| {
            Ok(RecommendationResponse {
                recommended_crop: d.recommend_crop(&reading)?,
                parameters: reading,
            })
        })
        .await;
        respond("recommendation", result)
    }
}
