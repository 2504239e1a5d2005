//! Registration log records

use serde::{Deserialize, Serialize};

/// One row of a district registration log
///
/// Field order is the column order: name, year, crop, area, production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    #[serde(rename = "Name")]
    pub user_name: String,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Crop")]
    pub crop_name: String,
    /// Registered area in acres
    #[serde(rename = "Area")]
    pub area: i64,
    /// Predicted production in quintals, truncated
    #[serde(rename = "Production")]
    pub predicted_production: i64,
}
