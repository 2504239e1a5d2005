//! Linear regression

use ndarray::Array1;
use serde::Deserialize;

use super::{ModelError, Prediction, PredictionModel};

#[derive(Debug, Deserialize)]
pub(crate) struct LinearJson {
    model_name: String,
    n_features: usize,
    #[serde(alias = "weights")]
    coefficients: Vec<f64>,
    #[serde(default, alias = "bias")]
    intercept: f64,
}

/// Ordinary least squares model: `w·x + b`
#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    weights: Array1<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Initialize with fitted weights
    pub fn from_weights(name: impl Into<String>, weights: Array1<f64>, intercept: f64) -> Self {
        Self {
            name: name.into(),
            weights,
            intercept,
        }
    }
}

impl TryFrom<LinearJson> for LinearModel {
    type Error = ModelError;

    fn try_from(parsed: LinearJson) -> Result<Self, Self::Error> {
        if parsed.coefficients.len() != parsed.n_features {
            return Err(ModelError::Invalid(format!(
                "{} coefficients for {} features",
                parsed.coefficients.len(),
                parsed.n_features
            )));
        }
        Ok(Self::from_weights(
            parsed.model_name,
            Array1::from_vec(parsed.coefficients),
            parsed.intercept,
        ))
    }
}

impl PredictionModel for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, features: &Array1<f64>) -> Result<Prediction, ModelError> {
        self.check_dimensions(features)?;
        Ok(Prediction::Value(features.dot(&self.weights) + self.intercept))
    }
}
