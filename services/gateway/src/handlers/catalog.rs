//! Crop, district and model catalog handlers

use std::sync::Arc;

use agripredict_common::{CROPS, DISTRICTS, ModelFamily};
use axum::{extract::State, response::Json};
use ml_inference::{ModelKey, ModelRegistry};

use crate::models::{
    ApiResponse, CropInfo, CropsResponse, DistrictInfo, DistrictsResponse, ModelsAvailable,
    ModelsStatus, ModelsStatusResponse,
};

/// Catalog handlers
#[derive(Debug, Clone)]
pub struct CatalogHandlers {
    registry: Arc<ModelRegistry>,
}

impl CatalogHandlers {
    pub const fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Supported crops with the per-crop models currently cached
    pub async fn available_crops(State(handlers): State<Self>) -> Json<ApiResponse<CropsResponse>> {
        let loaded = |family, crop| handlers.registry.is_loaded(ModelKey::for_crop(family, crop));
        let crops = CROPS
            .iter()
            .map(|crop| CropInfo {
                id: crop.id,
                name: crop.canonical_name,
                display: crop.display_name,
                models_available: ModelsAvailable {
                    production: loaded(ModelFamily::Production, crop),
                    price: loaded(ModelFamily::Price, crop),
                    district: loaded(ModelFamily::DistrictDemand, crop),
                },
            })
            .collect();
        Json(ApiResponse::success(CropsResponse { crops }))
    }

    /// Supported districts
    pub async fn available_districts() -> Json<ApiResponse<DistrictsResponse>> {
        Json(ApiResponse::success(DistrictsResponse {
            districts: DISTRICTS.iter().map(DistrictInfo::from).collect(),
        }))
    }

    /// Cached model counts per family
    ///
    /// The two singleton models are resolved, so an artifact added since
    /// startup is loaded and reported.
    pub async fn models_status(State(handlers): State<Self>) -> Json<ApiResponse<ModelsStatusResponse>> {
        let registry = &handlers.registry;
        let models = ModelsStatus {
            production_models: registry.loaded_count(ModelFamily::Production),
            price_models: registry.loaded_count(ModelFamily::Price),
            district_models: registry.loaded_count(ModelFamily::DistrictDemand),
            fertilizer_model: registry.resolve(ModelKey::fertilizer()).is_some(),
            recommendation_model: registry.resolve(ModelKey::crop_recommendation()).is_some(),
            total_crops_supported: CROPS.len(),
            total_districts: DISTRICTS.len(),
        };
        Json(ApiResponse::success(ModelsStatusResponse { models }))
    }
}
