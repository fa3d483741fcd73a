mod activations;
mod forest;
mod linear;
mod sequential;

pub use activations::ActFn;
pub use forest::{Forest, Tree};
pub use linear::Linear;
pub use sequential::{Dense, Sequential};

use crate::{Result, specs::RegressorSpec};

/// An opaque, pre-trained regression function.
pub trait Regressor: Send + Sync {
    /// Returns the amount of features the regressor expects.
    fn input_dim(&self) -> usize;

    /// Short name of the regressor kind, used for logging.
    fn kind(&self) -> &'static str;

    /// Predicts a single scalar for one (already scaled) feature vector.
    ///
    /// # Arguments
    /// * `x` - The features, exactly `input_dim()` of them.
    ///
    /// # Returns
    /// The prediction, or an error on a size mismatch or a non-finite output.
    fn predict(&self, x: &[f64]) -> Result<f64>;
}

impl RegressorSpec {
    /// Validates the artifact and builds the regressor it describes.
    pub fn build(self) -> Result<Box<dyn Regressor>> {
        let regressor: Box<dyn Regressor> = match self {
            RegressorSpec::Linear {
                coefficients,
                intercept,
            } => Box::new(Linear::new(coefficients, intercept)?),
            RegressorSpec::Sequential { layers } => Box::new(Sequential::from_specs(layers)?),
            RegressorSpec::Forest {
                n_features,
                trees,
                aggregation,
                base_score,
            } => Box::new(Forest::from_specs(n_features, trees, aggregation, base_score)?),
        };

        Ok(regressor)
    }
}
