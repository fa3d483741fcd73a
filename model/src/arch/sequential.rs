use ndarray::{Array1, Array2, ArrayView1};

use super::{ActFn, Regressor};
use crate::{
    ModelErr, Result,
    error::{ensure_finite, ensure_len},
    specs::LayerSpec,
};

/// A fully connected layer with fixed, pre-trained parameters.
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Array2<f64>,
    biases: Array1<f64>,
    act_fn: Option<ActFn>,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `dim` - The `(input, output)` dimension of the layer.
    /// * `weights` - Row-major weights, `dim.0 * dim.1` of them.
    /// * `biases` - One bias per output.
    /// * `act_fn` - An optional activation applied to the output.
    ///
    /// # Returns
    /// A new `Dense` or an error if the parameter counts don't match `dim`.
    pub fn new(
        dim: (usize, usize),
        weights: Vec<f64>,
        biases: Vec<f64>,
        act_fn: Option<ActFn>,
    ) -> Result<Self> {
        if dim.0 == 0 || dim.1 == 0 {
            return Err(ModelErr::InvalidArtifact(format!(
                "dense layer dimension {dim:?} must be non-zero"
            )));
        }

        if biases.len() != dim.1 {
            return Err(ModelErr::InvalidArtifact(format!(
                "dense layer {dim:?} expects {} biases, got {}",
                dim.1,
                biases.len()
            )));
        }

        ensure_finite("dense layer", weights.iter().chain(&biases)).map_err(|_| {
            ModelErr::InvalidArtifact("dense layer parameters must be finite".into())
        })?;

        let got = weights.len();
        let weights = Array2::from_shape_vec(dim, weights).map_err(|_| {
            ModelErr::InvalidArtifact(format!(
                "dense layer {dim:?} expects {} weights, got {got}",
                dim.0 * dim.1
            ))
        })?;

        Ok(Self {
            weights,
            biases: Array1::from_vec(biases),
            act_fn,
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    pub fn forward(&self, x: ArrayView1<f64>) -> Array1<f64> {
        let mut z = x.dot(&self.weights) + &self.biases;
        if let Some(act_fn) = self.act_fn {
            z.mapv_inplace(|z| act_fn.f(z));
        }

        z
    }
}

/// A feed-forward network: each layer's output is the next layer's input and the last layer
/// outputs a single value.
#[derive(Debug, Clone)]
pub struct Sequential {
    layers: Vec<Dense>,
}

impl Sequential {
    /// Creates a new `Sequential`, checking that adjacent layer dimensions chain and that the
    /// network ends in a single output.
    pub fn new(layers: Vec<Dense>) -> Result<Self> {
        let Some(last) = layers.last() else {
            return Err(ModelErr::InvalidArtifact(
                "sequential model must have at least one layer".into(),
            ));
        };

        if last.dim().1 != 1 {
            return Err(ModelErr::InvalidArtifact(format!(
                "last layer must output a single value, got {}",
                last.dim().1
            )));
        }

        for (i, pair) in layers.windows(2).enumerate() {
            let prev_out = pair[0].dim().1;
            let curr_in = pair[1].dim().0;
            if prev_out != curr_in {
                return Err(ModelErr::InvalidArtifact(format!(
                    "layer {}: input size ({curr_in}) does not match previous layer output size ({prev_out})",
                    i + 1
                )));
            }
        }

        Ok(Self { layers })
    }

    pub fn from_specs(specs: Vec<LayerSpec>) -> Result<Self> {
        let layers = specs
            .into_iter()
            .map(|spec| match spec {
                LayerSpec::Dense {
                    dim,
                    weights,
                    biases,
                    act_fn,
                } => Dense::new(dim, weights, biases, act_fn.map(ActFn::from)),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(layers)
    }
}

impl Regressor for Sequential {
    fn input_dim(&self) -> usize {
        self.layers[0].dim().0
    }

    fn kind(&self) -> &'static str {
        "sequential"
    }

    fn predict(&self, x: &[f64]) -> Result<f64> {
        ensure_len("regressor", x.len(), self.input_dim())?;

        let mut a = ArrayView1::from(x).to_owned();
        for layer in &self.layers {
            a = layer.forward(a.view());
        }

        let y = a[0];
        ensure_finite("regressor", [&y])?;
        Ok(y)
    }
}
