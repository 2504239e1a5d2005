//! Common error types for services

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ModelFamily, ReferenceKind};

/// Service error types
///
/// Every variant is a domain-level outcome. The gateway converts all of them
/// into a structured error payload at the request boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Crop or district id absent from the lookup tables
    #[error("Invalid {kind}")]
    InvalidReference { kind: ReferenceKind, id: i64 },

    /// Artifact missing or failed to deserialize
    #[error("{} model not available", .0.label())]
    ModelUnavailable(ModelFamily),

    /// Missing or non-coercible request field
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Registration log write or read failure
    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Worker running the request panicked or was cancelled
    #[error("Request interrupted")]
    Interrupted,
}

impl ServiceError {
    /// Missing required field
    pub fn missing_field(field: &str) -> Self {
        Self::MalformedInput(format!("missing required field '{field}'"))
    }

    /// Field present but not coercible to the expected type
    pub fn invalid_field(field: &str, expected: &str) -> Self {
        Self::MalformedInput(format!("field '{field}' must be {expected}"))
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Message safe to show to clients
    ///
    /// I/O failures name server paths, so clients get a fixed message and
    /// the full error goes to the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::IoFailure { .. } => "Registration log unavailable".to_string(),
            other => other.to_string(),
        }
    }

    /// Stable machine-readable code, used for log fields and metric labels
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidReference { .. } => "invalid_reference",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::MalformedInput(_) => "malformed_input",
            Self::IoFailure { .. } => "io_failure",
            Self::Interrupted => "interrupted",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
