//! Feature vector construction
//!
//! Column order is part of each model's contract: the artifacts were fitted
//! on exactly these layouts and carry no column names.

use agripredict_common::{ACRES_PER_HECTARE, REFERENCE_YEAR};
use ndarray::{Array1, array};
use serde::{Deserialize, Serialize};

/// Convert acres to whole hectares, truncating toward zero
///
/// 100 acres is 40.48 hectares and yields 40. The truncation is kept for
/// output compatibility with the trained models.
#[must_use]
pub fn acres_to_hectares(acres: i64) -> i64 {
    // Truncation is the contract here
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let hectares = (acres as f64 / ACRES_PER_HECTARE).trunc() as i64;
    hectares
}

/// `[district, year, area_hectares]`
#[must_use]
pub fn production_features(district_id: i64, area_hectares: i64) -> Array1<f64> {
    array![
        district_id as f64,
        REFERENCE_YEAR as f64,
        area_hectares as f64
    ]
}

/// `[year, area_hectares, production]`
#[must_use]
pub fn price_features(area_hectares: i64, production: i64) -> Array1<f64> {
    array![
        REFERENCE_YEAR as f64,
        area_hectares as f64,
        production as f64
    ]
}

/// `[year]`
#[must_use]
pub fn demand_features() -> Array1<f64> {
    array![REFERENCE_YEAR as f64]
}

/// Inputs of the fertilizer model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertilizerReading {
    pub temperature: i64,
    pub humidity: i64,
    pub moisture_content: i64,
    /// Crop code as the model was fitted on it
    pub crop: i64,
    pub nitrogen: i64,
    pub phosphorus: i64,
    pub potassium: i64,
}

impl FertilizerReading {
    /// `[temperature, humidity, moisture, crop, nitrogen, potassium, phosphorus]`
    ///
    /// Potassium precedes phosphorus.
    #[must_use]
    pub fn features(&self) -> Array1<f64> {
        array![
            self.temperature as f64,
            self.humidity as f64,
            self.moisture_content as f64,
            self.crop as f64,
            self.nitrogen as f64,
            self.potassium as f64,
            self.phosphorus as f64
        ]
    }
}

/// Inputs of the crop recommendation model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilReading {
    pub nitrogen: i64,
    pub phosphorus: i64,
    pub potassium: i64,
    pub temperature: i64,
    pub humidity: i64,
    pub ph: f64,
    pub rainfall: i64,
}

impl SoilReading {
    /// `[nitrogen, phosphorus, potassium, temperature, humidity, ph, rainfall]`
    #[must_use]
    pub fn features(&self) -> Array1<f64> {
        array![
            self.nitrogen as f64,
            self.phosphorus as f64,
            self.potassium as f64,
            self.temperature as f64,
            self.humidity as f64,
            self.ph,
            self.rainfall as f64
        ]
    }
}
