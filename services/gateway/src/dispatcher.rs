//! Prediction dispatcher
//!
//! Takes validated requests, resolves the models they need, builds the
//! feature vectors and derives the reported metrics. Every flow returns a
//! `ServiceResult`; nothing here panics on model output.

use std::sync::Arc;

use agripredict_common::{
    CropDescriptor, ModelFamily, REFERENCE_YEAR, RegistrationRecord, ServiceError, ServiceResult,
};
use ml_inference::features::{demand_features, price_features, production_features};
use ml_inference::{
    FertilizerReading, ModelKey, ModelRegistry, Prediction, PredictionModel, SoilReading,
    acres_to_hectares,
};
use ndarray::Array1;
use tracing::{debug, error, info, warn};

use crate::append_log::AppendLog;
use crate::metrics::{record_prediction, record_registration};
use crate::models::{
    DemandEstimate, EstimationReport, PriceEstimate, ProductionEstimate, StatisticsSummary,
};
use crate::payload::{CropRequest, PriceRequest, ProductionRequest, RegistrationRequest};
use crate::utils::truncate;

/// `trunc(production) x trunc(price)`
#[must_use]
pub fn revenue(production: i64, price: f64) -> i64 {
    production.saturating_mul(truncate(price))
}

/// `|trunc(demand - production)|`
#[must_use]
pub fn demand_gap(production: f64, demand: f64) -> i64 {
    truncate(demand - production).saturating_abs()
}

/// Production strictly above demand
#[must_use]
pub fn exceeds_demand(production: f64, demand: f64) -> bool {
    production > demand
}

fn run(
    key: ModelKey,
    model: &dyn PredictionModel,
    features: &Array1<f64>,
) -> ServiceResult<Prediction> {
    let family = key.family();
    match model.predict(features) {
        Ok(prediction) => {
            record_prediction(family, "success");
            debug!(model = %key, prediction = %prediction, "Prediction made");
            Ok(prediction)
        }
        Err(e) => {
            record_prediction(family, "failed");
            warn!(model = %key, error = %e, "Model failed at inference");
            Err(ServiceError::ModelUnavailable(family))
        }
    }
}

fn numeric(key: ModelKey, prediction: Prediction) -> ServiceResult<f64> {
    match prediction {
        Prediction::Value(value) => Ok(value),
        Prediction::Label(label) => {
            warn!(model = %key, label = %label, "Classifier where a regressor was expected");
            Err(ServiceError::ModelUnavailable(key.family()))
        }
    }
}

/// Executes prediction flows against the registry
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ModelRegistry>,
    log: Arc<AppendLog>,
}

impl Dispatcher {
    pub const fn new(registry: Arc<ModelRegistry>, log: Arc<AppendLog>) -> Self {
        Self { registry, log }
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    #[must_use]
    pub const fn log(&self) -> &Arc<AppendLog> {
        &self.log
    }

    /// Run a flow on the blocking pool
    ///
    /// Flows read artifacts and registration logs synchronously.
    pub async fn offload<T, F>(self: Arc<Self>, flow: F) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Self) -> ServiceResult<T> + Send + 'static,
    {
        match tokio::task::spawn_blocking(move || flow(&self)).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Blocking flow did not complete");
                Err(ServiceError::Interrupted)
            }
        }
    }

    /// Resolve and run a model
    ///
    /// A missing artifact and a model that fails at inference both surface
    /// as `ModelUnavailable`.
    fn predict(&self, key: ModelKey, features: &Array1<f64>) -> ServiceResult<Prediction> {
        let Some(model) = self.registry.resolve(key) else {
            record_prediction(key.family(), "unavailable");
            return Err(ServiceError::ModelUnavailable(key.family()));
        };
        run(key, model.as_ref(), features)
    }

    /// Numeric output of a regressor
    fn predict_value(&self, key: ModelKey, features: &Array1<f64>) -> ServiceResult<f64> {
        numeric(key, self.predict(key, features)?)
    }

    /// Numeric output of a model that may be absent
    ///
    /// Only absence yields zero; a present model that fails is an error.
    fn optional_value(&self, key: ModelKey, features: &Array1<f64>) -> ServiceResult<f64> {
        match self.registry.resolve(key) {
            Some(model) => numeric(key, run(key, model.as_ref(), features)?),
            None => {
                debug!(model = %key, "Model absent, reporting zero");
                Ok(0.0)
            }
        }
    }

    fn production_value(&self, request: &ProductionRequest, area_hectares: i64) -> ServiceResult<f64> {
        self.predict_value(
            ModelKey::for_crop(ModelFamily::Production, request.crop),
            &production_features(request.district.id, area_hectares),
        )
    }

    fn demand_value(&self, crop: &CropDescriptor) -> ServiceResult<f64> {
        self.predict_value(
            ModelKey::for_crop(ModelFamily::DistrictDemand, crop),
            &demand_features(),
        )
    }

    /// Expected yield for a district, crop and area
    pub fn predict_production(&self, request: &ProductionRequest) -> ServiceResult<ProductionEstimate> {
        let area_hectares = acres_to_hectares(request.area_acres);
        let production = self.production_value(request, area_hectares)?;

        Ok(ProductionEstimate {
            crop: request.crop.display_name,
            district: request.district.display_name,
            area_acres: request.area_acres,
            area_hectares,
            production_quintals: truncate(production),
        })
    }

    /// Harvest price per quintal and the revenue of the given production
    pub fn predict_price(&self, request: &PriceRequest) -> ServiceResult<PriceEstimate> {
        let area_hectares = acres_to_hectares(request.area_acres);
        let price = self.predict_value(
            ModelKey::for_crop(ModelFamily::Price, request.crop),
            &price_features(area_hectares, request.production),
        )?;

        Ok(PriceEstimate {
            crop: request.crop.display_name,
            price_per_quintal: truncate(price),
            total_revenue: revenue(request.production, price),
        })
    }

    /// Regional demand for a crop
    pub fn predict_demand(&self, request: &CropRequest) -> ServiceResult<DemandEstimate> {
        let demand = self.demand_value(request.crop)?;
        Ok(DemandEstimate {
            crop: request.crop.display_name,
            expected_demand_quintals: truncate(demand),
        })
    }

    /// Fertilizer label for soil and weather readings
    pub fn recommend_fertilizer(&self, reading: &FertilizerReading) -> ServiceResult<String> {
        self.predict(ModelKey::fertilizer(), &reading.features())
            .map(|prediction| prediction.to_string())
    }

    /// Crop label for soil nutrients and climate
    pub fn recommend_crop(&self, reading: &SoilReading) -> ServiceResult<String> {
        self.predict(ModelKey::crop_recommendation(), &reading.features())
            .map(|prediction| prediction.to_string())
    }

    /// Production, price and demand in one report
    ///
    /// Only the production model is required; a missing price or demand
    /// model reports zero for its figures, a failing one fails the report.
    pub fn estimate(&self, request: &ProductionRequest) -> ServiceResult<EstimationReport> {
        let area_hectares = acres_to_hectares(request.area_acres);
        let production = self.production_value(request, area_hectares)?;
        let production_quintals = truncate(production);

        let price = self.optional_value(
            ModelKey::for_crop(ModelFamily::Price, request.crop),
            &price_features(area_hectares, production_quintals),
        )?;
        let demand = self.optional_value(
            ModelKey::for_crop(ModelFamily::DistrictDemand, request.crop),
            &demand_features(),
        )?;

        Ok(EstimationReport {
            crop: request.crop,
            district: request.district,
            area_acres: request.area_acres,
            area_hectares,
            production_quintals,
            demand_quintals: truncate(demand),
            price_per_quintal: truncate(price),
            revenue: revenue(production_quintals, price),
            gap: demand_gap(production, demand),
            exceeds_demand: exceeds_demand(production, demand),
        })
    }

    /// Predict the registrant's production and append it to the district log
    pub fn register(&self, request: &RegistrationRequest) -> ServiceResult<RegistrationRecord> {
        let production = &request.production;
        let area_hectares = acres_to_hectares(production.area_acres);
        let predicted = match self.production_value(production, area_hectares) {
            Ok(value) => value,
            Err(e) => {
                record_registration("rejected");
                return Err(e);
            }
        };

        let record = RegistrationRecord {
            user_name: request.user.clone(),
            year: REFERENCE_YEAR,
            crop_name: production.crop.canonical_name.to_string(),
            area: production.area_acres,
            predicted_production: truncate(predicted),
        };

        if let Err(e) = self.log.record(production.district, &record) {
            record_registration("failed");
            return Err(e);
        }
        record_registration("recorded");
        info!(
            district = %production.district,
            crop = production.crop.canonical_name,
            production = record.predicted_production,
            "Crop registered"
        );
        Ok(record)
    }

    /// Registered production against expected demand
    pub fn statistics(&self, request: &CropRequest) -> ServiceResult<StatisticsSummary> {
        let expected_demand = self.demand_value(request.crop)?;
        let current_production = self.log.crop_total(request.crop.canonical_name)?;

        Ok(StatisticsSummary {
            crop: request.crop,
            current_production,
            expected_demand,
            production_gap: (expected_demand - current_production).max(0.0),
            exceeds_demand: current_production >= expected_demand,
        })
    }
}
