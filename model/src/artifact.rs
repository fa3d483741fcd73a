use std::{fs, path::Path};

use serde::de::DeserializeOwned;

use crate::{
    ModelErr, Result,
    arch::Regressor,
    scaler::Scaler,
    specs::{RegressorSpec, ScalerSpec},
};

/// A fitted scaler and the regressor trained on its output, loaded once and never mutated.
pub struct Artifacts {
    pub scaler: Box<dyn Scaler>,
    pub regressor: Box<dyn Regressor>,
}

impl Artifacts {
    /// Reads, decodes and validates both artifacts from disk.
    ///
    /// # Arguments
    /// * `model_path` - Path to the JSON encoded `RegressorSpec`.
    /// * `scaler_path` - Path to the JSON encoded `ScalerSpec`.
    ///
    /// # Returns
    /// The loaded artifacts, or an error naming the offending path.
    pub fn load<P, Q>(model_path: P, scaler_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let regressor: RegressorSpec = read_spec(model_path.as_ref())?;
        let scaler: ScalerSpec = read_spec(scaler_path.as_ref())?;
        Self::from_specs(regressor, scaler)
    }

    /// Builds both artifacts from their specs and checks they fit together.
    pub fn from_specs(regressor: RegressorSpec, scaler: ScalerSpec) -> Result<Self> {
        let scaler = scaler.build()?;
        let regressor = regressor.build()?;

        if scaler.dim() != regressor.input_dim() {
            return Err(ModelErr::InvalidArtifact(format!(
                "scaler outputs {} features but the {} regressor expects {}",
                scaler.dim(),
                regressor.kind(),
                regressor.input_dim()
            )));
        }

        Ok(Self { scaler, regressor })
    }
}

fn read_spec<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let load = || -> Result<T> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    };

    load().map_err(|e| ModelErr::Load {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}
