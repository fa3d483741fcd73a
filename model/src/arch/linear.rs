use ndarray::{Array1, ArrayView1};

use super::Regressor;
use crate::{
    ModelErr, Result,
    error::{ensure_finite, ensure_len},
};

/// An ordinary linear model: `x · coefficients + intercept`.
#[derive(Debug, Clone)]
pub struct Linear {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl Linear {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(ModelErr::InvalidArtifact(
                "linear model must have at least one coefficient".into(),
            ));
        }

        ensure_finite("linear model", coefficients.iter().chain([&intercept])).map_err(|_| {
            ModelErr::InvalidArtifact("linear model parameters must be finite".into())
        })?;

        Ok(Self {
            coefficients: Array1::from_vec(coefficients),
            intercept,
        })
    }
}

impl Regressor for Linear {
    fn input_dim(&self) -> usize {
        self.coefficients.len()
    }

    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, x: &[f64]) -> Result<f64> {
        ensure_len("regressor", x.len(), self.input_dim())?;

        let y = ArrayView1::from(x).dot(&self.coefficients) + self.intercept;
        ensure_finite("regressor", [&y])?;
        Ok(y)
    }
}
