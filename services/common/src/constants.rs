//! Common constants used across all services
//!
//! Single source of truth for the magic numbers baked into the trained models.

// Model input constants
/// Year every model was fitted against; fed as a feature and stamped on registrations
pub const REFERENCE_YEAR: i64 = 2022;
/// Acres per hectare used for area conversion
pub const ACRES_PER_HECTARE: f64 = 2.47;

// Status labels
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";
pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_INITIALIZING: &str = "initializing";

// Demand comparison labels
pub const DEMAND_EXCEEDED: &str = "exceeds demand";
pub const DEMAND_SHORTFALL: &str = "below demand";
pub const STATISTICS_EXCEEDED: &str = "Production Exceeds Demand";
pub const STATISTICS_SHORTFALL: &str = "Production Below Demand";

// Storage naming
pub const REGISTRATION_FILE_SUFFIX: &str = "_user_crop_entry.csv";
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "json";

// Server defaults
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const BYTES_PER_KB: usize = 1024;
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * BYTES_PER_KB;
