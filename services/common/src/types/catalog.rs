//! Static crop and district lookup tables
//!
//! Both tables are fixed for the lifetime of the process. Request ids are
//! checked against them before any model is resolved.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ServiceError, ServiceResult};

/// Supported crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CropDescriptor {
    /// Crop code used by request payloads
    pub id: i64,
    /// Lowercase name used for artifact and log naming
    pub canonical_name: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
}

/// Supported district
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DistrictDescriptor {
    /// District code, also the first production model feature
    pub id: i64,
    pub display_name: &'static str,
}

/// What kind of id failed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Crop,
    District,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crop => f.write_str("crop"),
            Self::District => f.write_str("district"),
        }
    }
}

pub const CROPS: [CropDescriptor; 5] = [
    CropDescriptor {
        id: 1,
        canonical_name: "paddy",
        display_name: "Paddy (Rice)",
    },
    CropDescriptor {
        id: 2,
        canonical_name: "sorghum",
        display_name: "Sorghum",
    },
    CropDescriptor {
        id: 3,
        canonical_name: "arhar",
        display_name: "Arhar (Pigeon Pea)",
    },
    CropDescriptor {
        id: 4,
        canonical_name: "groundnut",
        display_name: "Groundnut",
    },
    CropDescriptor {
        id: 5,
        canonical_name: "sesamum",
        display_name: "Sesamum",
    },
];

pub const DISTRICTS: [DistrictDescriptor; 9] = [
    DistrictDescriptor { id: 63, display_name: "Adilabad" },
    DistrictDescriptor { id: 62, display_name: "Karimnagar" },
    DistrictDescriptor { id: 55, display_name: "Hyderabad" },
    DistrictDescriptor { id: 61, display_name: "Khammam" },
    DistrictDescriptor { id: 58, display_name: "Mahabubnagar" },
    DistrictDescriptor { id: 57, display_name: "Medak" },
    DistrictDescriptor { id: 59, display_name: "Nalgonda" },
    DistrictDescriptor { id: 56, display_name: "Nizamabad" },
    DistrictDescriptor { id: 60, display_name: "Warangal" },
];

/// Look up a crop by request code
#[must_use]
pub fn crop_by_id(id: i64) -> Option<&'static CropDescriptor> {
    CROPS.iter().find(|crop| crop.id == id)
}


/// Look up a district by request code
#[must_use]
pub fn district_by_id(id: i64) -> Option<&'static DistrictDescriptor> {
    DISTRICTS.iter().find(|district| district.id == id)
}

/// Resolve a crop id or fail with `InvalidReference`
pub fn require_crop(id: i64) -> ServiceResult<&'static CropDescriptor> {
    crop_by_id(id).ok_or(ServiceError::InvalidReference {
        kind: ReferenceKind::Crop,
        id,
    })
}

/// Resolve a district id or fail with `InvalidReference`
pub fn require_district(id: i64) -> ServiceResult<&'static DistrictDescriptor> {
    district_by_id(id).ok_or(ServiceError::InvalidReference {
        kind: ReferenceKind::District,
        id,
    })
}

impl DistrictDescriptor {
    /// Lowercase stem used for the district's registration file
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.display_name.to_ascii_lowercase()
    }
}

impl fmt::Display for CropDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name)
    }
}

impl fmt::Display for DistrictDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name)
    }
}
