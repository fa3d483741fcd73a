use ndarray::{Array1, ArrayView1};

use crate::{
    ModelErr, Result,
    error::{ensure_finite, ensure_finite_input, ensure_len},
    specs::ScalerSpec,
};

/// A pre-fit, deterministic transform applied to raw features before prediction.
pub trait Scaler: Send + Sync {
    /// Returns the number of features this scaler was fit on.
    fn dim(&self) -> usize;

    /// Short name of the scaler kind, used for logging.
    fn kind(&self) -> &'static str;

    /// Transforms a single feature vector.
    ///
    /// # Arguments
    /// * `x` - The raw features, exactly `dim()` of them.
    ///
    /// # Returns
    /// The scaled features, or an error if `x` has the wrong length or holds NaN or infinity.
    fn transform(&self, x: &[f64]) -> Result<Vec<f64>>;
}

/// Standardization with a fitted per-feature mean and scale.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Creates a new `StandardScaler`.
    ///
    /// A zero `scale` entry belongs to a constant training column and is replaced by 1 so the
    /// feature is only centered.
    ///
    /// # Arguments
    /// * `mean` - The per-feature means.
    /// * `scale` - The per-feature standard deviations.
    ///
    /// # Returns
    /// A new `StandardScaler` or an error if the parameters are empty, differ in length or
    /// are not finite.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.is_empty() {
            return Err(ModelErr::InvalidArtifact(
                "scaler must have at least one feature".into(),
            ));
        }

        if mean.len() != scale.len() {
            return Err(ModelErr::InvalidArtifact(format!(
                "scaler mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }

        ensure_finite("scaler", mean.iter().chain(&scale))
            .map_err(|_| ModelErr::InvalidArtifact("scaler parameters must be finite".into()))?;

        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: Array1::from_vec(mean),
            scale,
        })
    }
}

impl Scaler for StandardScaler {
    fn dim(&self) -> usize {
        self.mean.len()
    }

    fn kind(&self) -> &'static str {
        "standard"
    }

    fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        ensure_len("scaler", x.len(), self.dim())?;
        ensure_finite_input(x)?;

        let x = ArrayView1::from(x);
        let z = (&x - &self.mean) / &self.scale;
        Ok(z.to_vec())
    }
}

/// A scaler that leaves features untouched, for models trained on raw inputs.
#[derive(Debug, Clone, Copy)]
pub struct IdentityScaler {
    dim: usize,
}

impl IdentityScaler {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(ModelErr::InvalidArtifact(
                "scaler must have at least one feature".into(),
            ));
        }

        Ok(Self { dim })
    }
}

impl Scaler for IdentityScaler {
    fn dim(&self) -> usize {
        self.dim
    }

    fn kind(&self) -> &'static str {
        "identity"
    }

    fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        ensure_len("scaler", x.len(), self.dim)?;
        ensure_finite_input(x)?;
        Ok(x.to_vec())
    }
}

impl ScalerSpec {
    /// Validates the artifact and builds the scaler it describes.
    pub fn build(self) -> Result<Box<dyn Scaler>> {
        let scaler: Box<dyn Scaler> = match self {
            ScalerSpec::Standard { mean, scale } => Box::new(StandardScaler::new(mean, scale)?),
            ScalerSpec::Identity { dim } => Box::new(IdentityScaler::new(dim)?),
        };

        Ok(scaler)
    }
}
