//! Premium prediction model
//!
//! The engine treats the regression model as a black box behind
//! [`PremiumModel`]: normalized features in, one non-negative monthly
//! premium out. The shipped artifact format supports a plain linear
//! model and a gradient-boosted tree ensemble (matching what the
//! offline trainer produces); swapping in another model is a new
//! artifact, not a code change elsewhere in the pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Black-box regression contract (fixed input arity, one output).
pub trait PremiumModel: std::fmt::Debug + Send + Sync {
    /// Number of features the model expects.
    fn n_features(&self) -> usize;

    /// Human-readable model kind for diagnostics/metadata.
    fn kind(&self) -> &'static str;

    /// Predict a monthly premium from a normalized feature vector.
    ///
    /// A vector of the wrong length is a fatal
    /// [`Error::SchemaMismatch`] (artifact version skew). Output is
    /// clamped to be non-negative.
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features() {
            return Err(Error::SchemaMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        Ok(self.predict_unchecked(features).max(0.0))
    }

    /// Raw prediction; callers go through [`PremiumModel::predict`].
    fn predict_unchecked(&self, features: &[f64]) -> f64;
}

/// Linear regression: `intercept + coefficients . features`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl PremiumModel for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict_unchecked(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// One node of a regression tree. Trees are stored as flat arrays with
/// child indices, the way the offline exporter writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
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

/// A single regression tree evaluated from node 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        // Artifact loading rejects non-forward child indices, so a walk
        // visits each node at most once.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if features.get(*feature).copied().unwrap_or(0.0) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Some(TreeNode::Leaf { value }) => return *value,
                None => return 0.0,
            }
        }
        // Only reachable for a hand-built tree with a cycle.
        0.0
    }
}

/// Gradient-boosted regression trees:
/// `base_score + learning_rate * sum(tree outputs)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleModel {
    pub n_features: usize,
    pub base_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsembleModel {
    /// Check tree structure before serving: split features must fit
    /// the declared arity, and child indices must point strictly
    /// forward so evaluation always terminates.
    fn validate(&self) -> std::result::Result<(), String> {
        for (t, tree) in self.trees.iter().enumerate() {
            for (i, node) in tree.nodes.iter().enumerate() {
                let TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } = node
                else {
                    continue;
                };
                if *feature >= self.n_features {
                    return Err(format!(
                        "tree {t} node {i} splits on feature {feature}, arity is {}",
                        self.n_features
                    ));
                }
                if *left <= i || *right <= i || *left >= tree.nodes.len() || *right >= tree.nodes.len()
                {
                    return Err(format!(
                        "tree {t} node {i} has non-forward or out-of-range child indices"
                    ));
                }
            }
        }
        Ok(())
    }
}

impl PremiumModel for TreeEnsembleModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }

    fn predict_unchecked(&self, features: &[f64]) -> f64 {
        self.base_score
            + self.learning_rate
                * self
                    .trees
                    .iter()
                    .map(|t| t.evaluate(features))
                    .sum::<f64>()
    }
}

/// Serde-tagged model artifact as written by the offline trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsembleModel),
}

impl ModelArtifact {
    /// Load a model artifact from JSON and box it behind the trait.
    pub fn load(path: &Path) -> Result<Box<dyn PremiumModel>> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::artifact(path, e))?;
        let artifact: ModelArtifact =
            serde_json::from_str(&content).map_err(|e| Error::artifact(path, e))?;
        if let ModelArtifact::TreeEnsemble(model) = &artifact {
            model.validate().map_err(|e| Error::artifact(path, e))?;
        }
        Ok(artifact.into_model())
    }

    pub fn into_model(self) -> Box<dyn PremiumModel> {
        match self {
            ModelArtifact::Linear(m) => Box::new(m),
            ModelArtifact::TreeEnsemble(m) => Box::new(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_predict() {
        let model = LinearModel {
            intercept: 100.0,
            coefficients: vec![2.0, -1.0],
        };
        assert_eq!(model.predict(&[3.0, 4.0]).unwrap(), 102.0);
    }

    #[test]
    fn test_prediction_clamped_non_negative() {
        let model = LinearModel {
            intercept: -500.0,
            coefficients: vec![1.0],
        };
        assert_eq!(model.predict(&[10.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_wrong_arity_is_schema_mismatch() {
        let model = LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0, 1.0, 1.0],
        };
        assert!(matches!(
            model.predict(&[1.0]),
            Err(Error::SchemaMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_tree_evaluation() {
        // feature 0 <= 5.0 ? 10.0 : 20.0
        let tree = Tree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 5.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: 10.0 },
                TreeNode::Leaf { value: 20.0 },
            ],
        };
        assert_eq!(tree.evaluate(&[3.0]), 10.0);
        assert_eq!(tree.evaluate(&[7.0]), 20.0);
    }

    #[test]
    fn test_ensemble_predict() {
        let tree = Tree {
            nodes: vec![TreeNode::Leaf { value: 50.0 }],
        };
        let model = TreeEnsembleModel {
            n_features: 2,
            base_score: 1000.0,
            learning_rate: 0.1,
            trees: vec![tree.clone(), tree],
        };
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 1010.0);
    }

    #[test]
    fn test_artifact_round_trip() {
        let json = r#"{
            "kind": "linear",
            "intercept": 1500.0,
            "coefficients": [1.0, 2.0]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        let model = artifact.into_model();
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn test_cyclic_tree_rejected_at_load() {
        // Node 0 points back at itself; without validation this walk
        // would never terminate.
        let json = r#"{
            "kind": "tree_ensemble",
            "n_features": 1,
            "base_score": 1200.0,
            "learning_rate": 0.1,
            "trees": [
                {"nodes": [
                    {"feature": 0, "threshold": 0.0, "left": 0, "right": 1},
                    {"value": 100.0}
                ]}
            ]
        }"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("premium_model.json");
        std::fs::write(&path, json).unwrap();

        assert!(matches!(
            ModelArtifact::load(&path),
            Err(Error::ArtifactLoad { .. })
        ));
    }

    #[test]
    fn test_split_feature_beyond_arity_rejected() {
        let json = r#"{
            "kind": "tree_ensemble",
            "n_features": 1,
            "base_score": 1200.0,
            "learning_rate": 0.1,
            "trees": [
                {"nodes": [
                    {"feature": 7, "threshold": 0.0, "left": 1, "right": 2},
                    {"value": -100.0},
                    {"value": 100.0}
                ]}
            ]
        }"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("premium_model.json");
        std::fs::write(&path, json).unwrap();

        assert!(matches!(
            ModelArtifact::load(&path),
            Err(Error::ArtifactLoad { .. })
        ));
    }

    #[test]
    fn test_cyclic_in_memory_tree_terminates() {
        let tree = Tree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                },
                TreeNode::Leaf { value: 100.0 },
            ],
        };
        assert_eq!(tree.evaluate(&[1.0]), 0.0);
    }

    #[test]
    fn test_tree_ensemble_artifact() {
        let json = r#"{
            "kind": "tree_ensemble",
            "n_features": 1,
            "base_score": 1200.0,
            "learning_rate": 0.1,
            "trees": [
                {"nodes": [
                    {"feature": 0, "threshold": 0.0, "left": 1, "right": 2},
                    {"value": -100.0},
                    {"value": 100.0}
                ]}
            ]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        let model = artifact.into_model();
        assert_eq!(model.predict(&[1.0]).unwrap(), 1210.0);
        assert_eq!(model.predict(&[-1.0]).unwrap(), 1190.0);
    }
}
