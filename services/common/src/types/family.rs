//! Model families

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of prediction capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// Yield in quintals from district, year and area
    Production,
    /// Harvest price per quintal from year, area and production
    Price,
    /// Regional demand in quintals from year
    DistrictDemand,
    /// Fertilizer label from soil and weather readings
    Fertilizer,
    /// Crop label from soil nutrients and climate
    CropRecommendation,
}

impl ModelFamily {
    pub const ALL: [Self; 5] = [
        Self::Production,
        Self::Price,
        Self::DistrictDemand,
        Self::Fertilizer,
        Self::CropRecommendation,
    ];

    /// Families keyed by crop; the rest are singletons
    pub const PER_CROP: [Self; 3] = [Self::Production, Self::Price, Self::DistrictDemand];

    #[must_use]
    pub const fn is_per_crop(self) -> bool {
        matches!(self, Self::Production | Self::Price | Self::DistrictDemand)
    }

    /// Capitalized name used in user-facing messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Price => "Price",
            Self::DistrictDemand => "District",
            Self::Fertilizer => "Fertilizer",
            Self::CropRecommendation => "Recommendation",
        }
    }

    /// Lowercase name used for log fields and metric labels
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Price => "price",
            Self::DistrictDemand => "district",
            Self::Fertilizer => "fertilizer",
            Self::CropRecommendation => "recommendation",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
