//! ML inference for agricultural advisory predictions
//!
//! Provides:
//! - Prediction models deserialized from exported estimator artifacts
//! - Feature vector builders in the column order each model was fitted on
//! - A lazily populated model registry keyed by family and crop

pub mod features;
pub mod models;
pub mod serving;

pub use features::{FertilizerReading, SoilReading, acres_to_hectares};
pub use models::{ModelError, Prediction, PredictionModel, parse_artifact};
pub use serving::{ArtifactStore, FsArtifactStore, ModelKey, ModelRegistry};
