//! Random forest evaluated directly from its exported tree arrays.
//!
//! Each tree is the flat node layout of a fitted decision tree: node `i` is a
//! leaf when `children_left[i] == -1`, otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the class
//! distribution at the node (counts or fractions). Feature values are cast
//! to `f32` before comparison, as the training library does.

use super::{Classifier, Prediction};
use crate::error::{InferenceError, ModelLoadError};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;

/// Serialized forest as dumped next to the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Class labels in probability-column order; must be `[0, 1]`.
    pub classes: Vec<i64>,
    #[serde(default)]
    pub n_features: Option<usize>,
    pub trees: Vec<TreeArrays>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Normalized class distribution
    Leaf(Vec<f64>),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_arrays(t: &TreeArrays, n_classes: usize, idx: usize) -> Result<Self, ModelLoadError> {
        let n = t.children_left.len();
        let malformed = |msg: String| ModelLoadError::Malformed(format!("tree {}: {}", idx, msg));
        if n == 0 {
            return Err(malformed("no nodes".into()));
        }
        if t.children_right.len() != n
            || t.feature.len() != n
            || t.threshold.len() != n
            || t.value.len() != n
        {
            return Err(malformed("node arrays differ in length".into()));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            if t.children_left[i] == LEAF {
                let dist = &t.value[i];
                if dist.len() != n_classes {
                    return Err(malformed(format!(
                        "leaf {} has {} class values, expected {}",
                        i,
                        dist.len(),
                        n_classes
                    )));
                }
                let total: f64 = dist.iter().sum();
                if !(total > 0.0) || dist.iter().any(|v| *v < 0.0) {
                    return Err(malformed(format!("leaf {} has no class mass", i)));
                }
                nodes.push(Node::Leaf(dist.iter().map(|v| v / total).collect()));
                continue;
            }
            // Children always follow their parent, which rules out cycles.
            let child = |c: i64| -> Result<usize, ModelLoadError> {
                if c > i as i64 && (c as usize) < n {
                    Ok(c as usize)
                } else {
                    Err(malformed(format!("node {} has child index {}", i, c)))
                }
            };
            if t.feature[i] < 0 {
                return Err(malformed(format!("split {} has feature {}", i, t.feature[i])));
            }
            nodes.push(Node::Split {
                feature: t.feature[i] as usize,
                threshold: t.threshold[i],
                left: child(t.children_left[i])?,
                right: child(t.children_right[i])?,
            });
        }
        Ok(Self { nodes })
    }

    fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf(_) => None,
            })
            .max()
    }

    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Leaf(dist) => return dist,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let v = x[*feature] as f32 as f64;
                    i = if v <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

pub struct ForestClassifier {
    trees: Vec<Tree>,
    classes: Vec<u8>,
    n_features: usize,
}

impl ForestClassifier {
    pub fn from_slice(data: &[u8]) -> Result<Self, ModelLoadError> {
        let model: ForestModel = serde_json::from_slice(data)?;
        Self::new(model)
    }

    pub fn new(model: ForestModel) -> Result<Self, ModelLoadError> {
        if model.classes != [0i64, 1] {
            return Err(ModelLoadError::Malformed(format!(
                "expected binary classes [0, 1], got {:?}",
                model.classes
            )));
        }
        if model.trees.is_empty() {
            return Err(ModelLoadError::Malformed("forest has no trees".into()));
        }
        let classes: Vec<u8> = vec![0, 1];
        let trees = model
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| Tree::from_arrays(t, classes.len(), i))
            .collect::<Result<Vec<_>, _>>()?;

        let used = trees
            .iter()
            .filter_map(Tree::max_feature)
            .max()
            .map_or(0, |f| f + 1);
        let n_features = match model.n_features {
            Some(n) if n < used => {
                return Err(ModelLoadError::Malformed(format!(
                    "splits reference feature {} but n_features is {}",
                    used - 1,
                    n
                )))
            }
            Some(n) => n,
            None => used,
        };

        Ok(Self {
            trees,
            classes,
            n_features,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean of per-tree leaf distributions.
    pub fn predict_proba(&self, vector: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        let x = vector.as_slice();
        if x.len() < self.n_features {
            return Err(InferenceError::FeatureCount {
                expected: self.n_features,
                actual: x.len(),
            });
        }
        let mut acc = vec![0.0f64; self.classes.len()];
        for tree in &self.trees {
            for (a, p) in acc.iter_mut().zip(tree.leaf(x)) {
                *a += p;
            }
        }
        let n = self.trees.len() as f64;
        acc.iter_mut().for_each(|a| *a /= n);
        Ok(acc)
    }

    /// First class with the highest probability.
    fn argmax(&self, proba: &[f64]) -> u8 {
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

impl Classifier for ForestClassifier {
    fn predict_probability(&self, vector: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(self.predict_proba(vector)?[1].clamp(0.0, 1.0))
    }

    fn predict_class(&self, vector: &FeatureVector) -> Result<u8, InferenceError> {
        Ok(self.argmax(&self.predict_proba(vector)?))
    }

    fn evaluate(&self, vector: &FeatureVector) -> Result<Prediction, InferenceError> {
        let proba = self.predict_proba(vector)?;
        Ok(Prediction {
            probability: proba[1].clamp(0.0, 1.0),
            class: self.argmax(&proba),
        })
    }
}
