//! API handlers for the prediction service endpoints

pub mod catalog;
pub mod forms;
pub mod health;
pub mod predict;

pub use catalog::CatalogHandlers;
pub use forms::PageHandlers;
pub use health::HealthHandlers;
pub use predict::PredictHandlers;
