//! Plain-text reports shown on the browser result page

use std::fmt::Write;

use ml_inference::{FertilizerReading, SoilReading};

use crate::models::EstimationReport;
use crate::utils::thousands;

pub const REGISTRATION_SUCCESS: &str = "Registration successful";

const RULE: &str = "------------------------------------------------";

/// Yield, demand and price summary for one district and crop
#[must_use]
pub fn estimation_report(report: &EstimationReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "{} Prediction Report", report.crop.display_name);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "District: {}", report.district.display_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "Production Analysis:");
    let _ = writeln!(out, "  Expected Yield:  {} Quintals", thousands(report.production_quintals));
    let _ = writeln!(out, "  District Demand: {} Quintals", thousands(report.demand_quintals));
    let _ = writeln!(out, "  Status:          {}", report.demand_status());
    let _ = writeln!(out, "  Gap:             {} Quintals", thousands(report.gap));
    let _ = writeln!(out);
    let _ = writeln!(out, "Price Analysis:");
    let _ = writeln!(out, "  Estimated Price:   Rs. {} per Quintal", thousands(report.price_per_quintal));
    let _ = writeln!(out, "  Estimated Revenue: Rs. {}", thousands(report.revenue));
    let _ = writeln!(out);
    let _ = writeln!(out, "Area Information:");
    let _ = writeln!(out, "  Input Area:     {} acres", report.area_acres);
    let _ = writeln!(out, "  Converted Area: {} hectares", report.area_hectares);
    out
}

#[must_use]
pub fn fertilizer_report(reading: &FertilizerReading, fertilizer: &str) -> String {
    format!(
        "Fertilizer Recommendation Report\n\
         {RULE}\n\
         \n\
         Soil & Environmental Parameters:\n\
         \x20 Temperature:      {}\u{b0}C\n\
         \x20 Humidity:         {}%\n\
         \x20 Moisture Content: {}\n\
         \x20 Crop Type:        {}\n\
         \n\
         Nutrient Analysis:\n\
         \x20 Nitrogen (N):   {} mg/kg\n\
         \x20 Phosphorus (P): {} mg/kg\n\
         \x20 Potassium (K):  {} mg/kg\n\
         \n\
         Recommended Fertilizer: {fertilizer}\n",
        reading.temperature,
        reading.humidity,
        reading.moisture_content,
        reading.crop,
        reading.nitrogen,
        reading.phosphorus,
        reading.potassium,
    )
}

#[must_use]
pub fn recommendation_report(reading: &SoilReading, crop: &str) -> String {
    format!(
        "Crop Recommendation Report\n\
         {RULE}\n\
         \n\
         Soil Nutrients:\n\
         \x20 Nitrogen (N):   {} mg/kg\n\
         \x20 Phosphorus (P): {} mg/kg\n\
         \x20 Potassium (K):  {} mg/kg\n\
         \n\
         Environmental Factors:\n\
         \x20 Temperature: {}\u{b0}C\n\
         \x20 Humidity:    {}%\n\
         \x20 Rainfall:    {} mm\n\
         \x20 pH Level:    {}\n\
         \n\
         Recommended Crop: {crop}\n",
        reading.nitrogen,
        reading.phosphorus,
        reading.potassium,
        reading.temperature,
        reading.humidity,
        reading.rainfall,
        reading.ph,
    )
}
