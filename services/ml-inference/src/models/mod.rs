//! Prediction models loaded from exported estimator artifacts
//!
//! Artifacts are JSON exports of fitted estimators. The `model_type` field
//! selects the format:
//!
//! ```json
//! { "model_type": "linear_regression", "model_name": "paddy_production",
//!   "n_features": 3, "coefficients": [0.1, 0.0, 12.5], "intercept": 4.2 }
//! ```
//!
//! `decision_tree` and `random_forest` artifacts carry node arrays (see
//! [`tree`]); with a `classes` list they act as classifiers and return a label.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use ndarray::Array1;
use serde::Deserialize;
use thiserror::Error;

mod linear;
pub mod tree;

pub use linear::LinearModel;
pub use tree::{DecisionTree, RandomForest, TreeNode};

/// Model loading and inference errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid artifact: {0}")]
    Invalid(String),

    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Output of a model
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Regression output
    Value(f64),
    /// Classification output
    Label(String),
}

impl Prediction {
    /// Numeric output, if this is a regression result
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Label(_) => None,
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Base trait for all loaded models
pub trait PredictionModel: Send + Sync + fmt::Debug {
    /// Name recorded in the artifact
    fn name(&self) -> &str;

    /// Number of input columns
    fn n_features(&self) -> usize;

    /// Make a prediction given one feature row
    fn predict(&self, features: &Array1<f64>) -> Result<Prediction, ModelError>;

    /// Reject rows whose width differs from the fitted width
    fn check_dimensions(&self, features: &Array1<f64>) -> Result<(), ModelError> {
        if features.len() == self.n_features() {
            Ok(())
        } else {
            Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.len(),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
enum ArtifactJson {
    LinearRegression(linear::LinearJson),
    DecisionTree(tree::DecisionTreeJson),
    RandomForest(tree::RandomForestJson),
}

/// Deserialize and validate an artifact
pub fn parse_artifact(json: &str) -> Result<Arc<dyn PredictionModel>, ModelError> {
    let model: Arc<dyn PredictionModel> = match serde_json::from_str(json)? {
        ArtifactJson::LinearRegression(parsed) => Arc::new(LinearModel::try_from(parsed)?),
        ArtifactJson::DecisionTree(parsed) => Arc::new(DecisionTree::try_from(parsed)?),
        ArtifactJson::RandomForest(parsed) => Arc::new(RandomForest::try_from(parsed)?),
    };
    Ok(model)
}
