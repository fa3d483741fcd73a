use model::{Artifacts, ModelErr, Regressor, Scaler};
use serde::Serialize;

use crate::{
    features::{FeatureVector, FEATURE_COUNT},
    price::{format_price, round_price},
};

/// Read-only handle over the loaded scaler and regressor, shared by every request.
pub struct Pipeline {
    scaler: Box<dyn Scaler>,
    regressor: Box<dyn Regressor>,
}

impl Pipeline {
    /// Creates a pipeline without checking dimensions, mismatches surface per request.
    pub fn new(scaler: Box<dyn Scaler>, regressor: Box<dyn Regressor>) -> Self {
        Self { scaler, regressor }
    }

    /// Wraps loaded artifacts, rejecting any whose input dimension doesn't fit the feature
    /// vector.
    pub fn from_artifacts(artifacts: Artifacts) -> model::Result<Self> {
        let Artifacts { scaler, regressor } = artifacts;
        if scaler.dim() != FEATURE_COUNT {
            return Err(ModelErr::InvalidArtifact(format!(
                "scaler was fit on {} features, expected {FEATURE_COUNT}",
                scaler.dim()
            )));
        }

        if regressor.input_dim() != scaler.dim() {
            return Err(ModelErr::InvalidArtifact(format!(
                "regressor expects {} features but the scaler outputs {}",
                regressor.input_dim(),
                scaler.dim()
            )));
        }

        Ok(Self::new(scaler, regressor))
    }

    pub fn describe(&self) -> String {
        format!(
            "{} scaler + {} regressor over {} features",
            self.scaler.kind(),
            self.regressor.kind(),
            self.scaler.dim()
        )
    }

    /// Scales the feature vector and runs the regressor on it.
    pub fn predict(&self, features: &FeatureVector) -> model::Result<f64> {
        let scaled = self.scaler.transform(&features.values())?;
        self.regressor.predict(&scaled)
    }
}

/// Successful `/predict` response body.
#[derive(Debug, Serialize)]
pub struct Prediction {
    pub predicted_price: f64,
    pub formatted_price: String,
    pub input_features: FeatureVector,
}

impl Prediction {
    pub fn new(price: f64, input_features: FeatureVector) -> Self {
        Self {
            predicted_price: round_price(price),
            formatted_price: format_price(price),
            input_features,
        }
    }
}
