//! Shared domain types, lookup tables and errors for the AgriPredict services

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

pub use config::*;
pub use constants::*;
pub use errors::*;
pub use types::*;
