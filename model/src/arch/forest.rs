use super::Regressor;
use crate::{
    ModelErr, Result,
    error::{ensure_finite, ensure_len},
    specs::{AggregationSpec, NodeSpec, TreeSpec},
};

/// A single decision tree stored as a flat node list, node `0` is the root.
///
/// Children always sit after their parent, so traversal terminates.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeSpec>,
}

impl Tree {
    /// Creates a new `Tree` after validating its structure.
    ///
    /// # Arguments
    /// * `nodes` - The flat node list.
    /// * `n_features` - The amount of features the tree may split on.
    ///
    /// # Returns
    /// A new `Tree` or an error if it's empty, splits on an unknown feature or has children
    /// that are out of range or point backwards.
    pub fn new(nodes: Vec<NodeSpec>, n_features: usize) -> Result<Self> {
        if nodes.is_empty() {
            return Err(ModelErr::InvalidArtifact(
                "tree must have at least one node".into(),
            ));
        }

        for (i, node) in nodes.iter().enumerate() {
            match *node {
                NodeSpec::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(ModelErr::InvalidArtifact(format!(
                            "node {i} splits on feature {feature} but there are {n_features}"
                        )));
                    }

                    if threshold.is_nan() {
                        return Err(ModelErr::InvalidArtifact(format!(
                            "node {i} has a NaN threshold"
                        )));
                    }

                    for child in [left, right] {
                        if child <= i || child >= nodes.len() {
                            return Err(ModelErr::InvalidArtifact(format!(
                                "node {i} has invalid child {child}"
                            )));
                        }
                    }
                }
                NodeSpec::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelErr::InvalidArtifact(format!(
                            "leaf {i} has a non-finite value"
                        )));
                    }
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Walks the tree for `x`, going left when `x[feature] <= threshold`.
    pub(crate) fn eval(&self, x: &[f64]) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                NodeSpec::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => i = if x[feature] <= threshold { left } else { right },
                NodeSpec::Leaf { value } => return value,
            }
        }
    }
}

/// A tree ensemble: either a random forest (mean of trees) or a boosted ensemble
/// (`base_score` plus the sum of trees).
#[derive(Debug, Clone)]
pub struct Forest {
    n_features: usize,
    trees: Vec<Tree>,
    aggregation: AggregationSpec,
    base_score: f64,
}

impl Forest {
    pub fn from_specs(
        n_features: usize,
        trees: Vec<TreeSpec>,
        aggregation: AggregationSpec,
        base_score: f64,
    ) -> Result<Self> {
        if n_features == 0 {
            return Err(ModelErr::InvalidArtifact(
                "forest must have at least one feature".into(),
            ));
        }

        if trees.is_empty() {
            return Err(ModelErr::InvalidArtifact(
                "forest must have at least one tree".into(),
            ));
        }

        if !base_score.is_finite() {
            return Err(ModelErr::InvalidArtifact(
                "forest base_score must be finite".into(),
            ));
        }

        let trees = trees
            .into_iter()
            .map(|tree| Tree::new(tree.nodes, n_features))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            n_features,
            trees,
            aggregation,
            base_score,
        })
    }
}

impl Regressor for Forest {
    fn input_dim(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "forest"
    }

    fn predict(&self, x: &[f64]) -> Result<f64> {
        ensure_len("regressor", x.len(), self.n_features)?;

        let total: f64 = self.trees.iter().map(|tree| tree.eval(x)).sum();
        let y = match self.aggregation {
            AggregationSpec::Mean => total / self.trees.len() as f64,
            AggregationSpec::Sum => self.base_score + total,
        };

        ensure_finite("regressor", [&y])?;
        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> TreeSpec {
        TreeSpec {
            nodes: vec![
                NodeSpec::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                NodeSpec::Leaf { value: low },
                NodeSpec::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn mean_aggregation_averages_trees() {
        let forest = Forest::from_specs(
            2,
            vec![stump(0, 0.5, 10.0, 20.0), stump(1, 0.0, 100.0, 200.0)],
            AggregationSpec::Mean,
            0.0,
        )
        .unwrap();

        assert_eq!(forest.predict(&[0.0, 0.0]).unwrap(), 55.0);
        assert_eq!(forest.predict(&[1.0, 1.0]).unwrap(), 110.0);
    }

    #[test]
    fn sum_aggregation_adds_base_score() {
        let forest = Forest::from_specs(
            1,
            vec![stump(0, 0.5, -1.0, 1.0), stump(0, 1.5, -2.0, 2.0)],
            AggregationSpec::Sum,
            50.0,
        )
        .unwrap();

        assert_eq!(forest.predict(&[1.0]).unwrap(), 49.0);
        assert_eq!(forest.predict(&[2.0]).unwrap(), 53.0);
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let tree = Tree::new(stump(0, 0.5, 1.0, 2.0).nodes, 1).unwrap();
        assert_eq!(tree.eval(&[0.5]), 1.0);
    }

    #[test]
    fn rejects_malformed_trees() {
        // backwards child
        let cyclic = vec![NodeSpec::Split {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
        }];
        assert!(Tree::new(cyclic, 1).is_err());

        // unknown feature
        assert!(Tree::new(stump(3, 0.0, 0.0, 0.0).nodes, 2).is_err());

        // out of range child
        let dangling = vec![
            NodeSpec::Split {
                feature: 0,
                threshold: 0.0,
                left: 1,
                right: 5,
            },
            NodeSpec::Leaf { value: 0.0 },
        ];
        assert!(Tree::new(dangling, 1).is_err());

        assert!(Tree::new(vec![], 1).is_err());
    }

    #[test]
    fn rejects_wrong_input_length() {
        let forest =
            Forest::from_specs(2, vec![stump(0, 0.0, 0.0, 1.0)], AggregationSpec::Mean, 0.0)
                .unwrap();
        assert!(forest.predict(&[0.0]).is_err());
    }
}
