use serde::{Deserialize, Serialize};

/// Serialized form of a fitted scaler artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerSpec {
    /// Standardization: `(x - mean) / scale`.
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// Passes the input through untouched.
    Identity { dim: usize },
}

/// Serialized form of the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Relu,
    Sigmoid,
    Tanh,
}

/// Serialized form of a single layer of a sequential network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    /// A fully connected layer, `weights` is row-major with shape `dim`.
    Dense {
        dim: (usize, usize),
        weights: Vec<f64>,
        biases: Vec<f64>,
        #[serde(default)]
        act_fn: Option<ActFnSpec>,
    },
}

/// A node of a decision tree, children are indices into the tree's node list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

/// How the leaf values of a forest are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationSpec {
    /// Average of the trees (random forests).
    Mean,
    /// `base_score` plus the sum of the trees (gradient boosting).
    Sum,
}

/// Serialized form of a fitted regression model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressorSpec {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    Sequential {
        layers: Vec<LayerSpec>,
    },
    Forest {
        n_features: usize,
        trees: Vec<TreeSpec>,
        aggregation: AggregationSpec,
        #[serde(default)]
        base_score: f64,
    },
}
