//! REST API models and request/response types

use agripredict_common::{
    CropDescriptor, DEMAND_EXCEEDED, DEMAND_SHORTFALL, DistrictDescriptor, STATISTICS_EXCEEDED,
    STATISTICS_SHORTFALL, STATUS_ERROR, STATUS_SUCCESS, ServiceError,
};
use ml_inference::{FertilizerReading, SoilReading};
use serde::Serialize;

/// Generic API response wrapper
///
/// Success payload fields are flattened next to `status`; failures carry a
/// `message` instead. Both are sent with HTTP 200.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// `success` or `error`
    pub status: &'static str,
    /// Response data (if successful)
    #[serde(flatten)]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful API response
    pub const fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            data: Some(data),
            message: None,
        }
    }

    /// Create an error API response
    #[must_use]
    pub fn error(error: &ServiceError) -> Self {
        Self {
            status: STATUS_ERROR,
            data: None,
            message: Some(error.public_message()),
        }
    }
}

/// Health check response, sent without the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// `healthy` once any production model is loaded or present
    pub status: &'static str,
    /// Production models in the cache
    pub models_loaded: usize,
}

/// Catalog models
#[derive(Debug, Serialize)]
pub struct CropsResponse {
    pub crops: Vec<CropInfo>,
}

#[derive(Debug, Serialize)]
pub struct CropInfo {
    pub id: i64,
    pub name: &'static str,
    pub display: &'static str,
    pub models_available: ModelsAvailable,
}

/// Per-crop cache membership
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelsAvailable {
    pub production: bool,
    pub price: bool,
    pub district: bool,
}

#[derive(Debug, Serialize)]
pub struct DistrictsResponse {
    pub districts: Vec<DistrictInfo>,
}

#[derive(Debug, Serialize)]
pub struct DistrictInfo {
    pub id: i64,
    pub name: &'static str,
}

impl From<&DistrictDescriptor> for DistrictInfo {
    fn from(district: &DistrictDescriptor) -> Self {
        Self {
            id: district.id,
            name: district.display_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelsStatusResponse {
    pub models: ModelsStatus,
}

#[derive(Debug, Serialize)]
pub struct ModelsStatus {
    pub production_models: usize,
    pub price_models: usize,
    pub district_models: usize,
    pub fertilizer_model: bool,
    pub recommendation_model: bool,
    pub total_crops_supported: usize,
    pub total_districts: usize,
}

/// Prediction models
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionEstimate {
    /// Crop display name
    pub crop: &'static str,
    /// District display name
    pub district: &'static str,
    pub area_acres: i64,
    pub area_hectares: i64,
    pub production_quintals: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceEstimate {
    pub crop: &'static str,
    pub price_per_quintal: i64,
    pub total_revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemandEstimate {
    pub crop: &'static str,
    pub expected_demand_quintals: i64,
}

/// Echo of the fertilizer inputs; the crop code is not repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FertilizerParameters {
    pub temperature: i64,
    pub humidity: i64,
    pub moisture_content: i64,
    pub nitrogen: i64,
    pub phosphorus: i64,
    pub potassium: i64,
}

impl From<&FertilizerReading> for FertilizerParameters {
    fn from(reading: &FertilizerReading) -> Self {
        Self {
            temperature: reading.temperature,
            humidity: reading.humidity,
            moisture_content: reading.moisture_content,
            nitrogen: reading.nitrogen,
            phosphorus: reading.phosphorus,
            potassium: reading.potassium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FertilizerResponse {
    pub recommended_fertilizer: String,
    pub parameters: FertilizerParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub recommended_crop: String,
    pub parameters: SoilReading,
}

/// Full estimation for the browser report
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationReport {
    pub crop: &'static CropDescriptor,
    pub district: &'static DistrictDescriptor,
    pub area_acres: i64,
    pub area_hectares: i64,
    pub production_quintals: i64,
    pub demand_quintals: i64,
    pub price_per_quintal: i64,
    pub revenue: i64,
    /// `|trunc(demand - production)|`
    pub gap: i64,
    /// Strictly above demand
    pub exceeds_demand: bool,
}

impl EstimationReport {
    #[must_use]
    pub const fn demand_status(&self) -> &'static str {
        if self.exceeds_demand {
            DEMAND_EXCEEDED
        } else {
            DEMAND_SHORTFALL
        }
    }
}

/// Registered production against expected demand
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsSummary {
    pub crop: &'static CropDescriptor,
    /// Sum of registered production across all districts
    pub current_production: f64,
    pub expected_demand: f64,
    /// `max(0, demand - current)`
    pub production_gap: f64,
    /// At or above demand
    pub exceeds_demand: bool,
}

impl StatisticsSummary {
    #[must_use]
    pub const fn status(&self) -> &'static str {
        if self.exceeds_demand {
            STATISTICS_EXCEEDED
        } else {
            STATISTICS_SHORTFALL
        }
    }
}
