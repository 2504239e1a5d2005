//! Decision tree and random forest models
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "model_type": "decision_tree",
//!   "model_name": "fertilizer",
//!   "n_features": 7,
//!   "classes": ["10-26-26", "DAP", "Urea"],
//!   "tree": {
//!     "nodes": [
//!       { "feature": 4, "threshold": 20.5, "left": 1, "right": 2, "value": null },
//!       { "feature": -1, "threshold": 0.0, "left": -1, "right": -1, "value": [0.0, 3.0, 0.0] },
//!       { "feature": -1, "threshold": 0.0, "left": -1, "right": -1, "value": [0.0, 0.0, 5.0] }
//!     ]
//!   }
//! }
//! ```
//!
//! Without `classes` the model is a regressor and returns `value[0]` of the
//! reached leaf. A `random_forest` artifact carries `trees` instead of `tree`.
//!
//! # Tree Traversal
//!
//! - Start at node 0
//! - `feature == -1` marks a leaf
//! - Go left when `features[feature] <= threshold` or the input is NaN, else right

use ndarray::Array1;
use serde::{Deserialize, Deserializer};

use super::{ModelError, Prediction, PredictionModel};

/// A single node in the tree
#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    /// Feature index to split on (-1 for leaf nodes)
    pub feature: i32,
    /// Split threshold
    pub threshold: f64,
    /// Index of left child (-1 for leaf nodes)
    pub left: i32,
    /// Index of right child (-1 for leaf nodes)
    pub right: i32,
    /// Leaf payload: class weights for classifiers, `[target]` for regressors
    pub value: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreeJson {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionTreeJson {
    model_name: String,
    n_features: usize,
    #[serde(default, deserialize_with = "deserialize_classes")]
    classes: Option<Vec<String>>,
    tree: TreeJson,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RandomForestJson {
    model_name: String,
    n_features: usize,
    #[serde(default, deserialize_with = "deserialize_classes")]
    classes: Option<Vec<String>>,
    trees: Vec<TreeJson>,
}

/// Class labels may be exported as strings or numbers
fn deserialize_classes<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|labels| {
        labels
            .into_iter()
            .map(|label| match label {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect()
    }))
}

/// Validated node array
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    /// Check child links, split features and leaf widths up front so that
    /// traversal cannot index out of bounds
    fn validate(json: TreeJson, n_features: usize, leaf_width: Option<usize>) -> Result<Self, ModelError> {
        let nodes = json.nodes;
        if nodes.is_empty() {
            return Err(ModelError::Invalid("tree has no nodes".to_string()));
        }
        let in_range = |idx: i32| usize::try_from(idx).is_ok_and(|i| i < nodes.len());

        for (i, node) in nodes.iter().enumerate() {
            if node.feature < 0 {
                let width = node.value.as_ref().map_or(0, Vec::len);
                let ok = match leaf_width {
                    Some(expected) => width == expected,
                    None => width >= 1,
                };
                if !ok {
                    return Err(ModelError::Invalid(format!(
                        "leaf {i} has {width} values"
                    )));
                }
            } else {
                if !usize::try_from(node.feature).is_ok_and(|f| f < n_features) {
                    return Err(ModelError::Invalid(format!(
                        "node {i} splits on feature {} of {n_features}",
                        node.feature
                    )));
                }
                if !in_range(node.left) || !in_range(node.right) {
                    return Err(ModelError::Invalid(format!(
                        "node {i} has a child outside the tree"
                    )));
                }
            }
        }
        Ok(Self { nodes })
    }

    /// Walk from the root to a leaf and return its payload
    fn leaf(&self, features: &Array1<f64>) -> Result<&[f64], ModelError> {
        let mut idx = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[idx];
            if node.feature < 0 {
                return Ok(node.value.as_deref().unwrap_or_default());
            }
            let x = features[node.feature as usize];
            let next = if x.is_nan() || x <= node.threshold {
                node.left
            } else {
                node.right
            };
            idx = next as usize;
        }
        Err(ModelError::Invalid("tree contains a cycle".to_string()))
    }
}

/// Index of the largest weight; first wins on ties
fn argmax(weights: &[f64]) -> usize {
    weights
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_w), (i, &w)| {
            if w > best_w { (i, w) } else { (best, best_w) }
        })
        .0
}

fn label_for(classes: &[String], weights: &[f64]) -> Prediction {
    Prediction::Label(classes[argmax(weights)].clone())
}

/// Single decision tree, regressor or classifier
#[derive(Debug, Clone)]
pub struct DecisionTree {
    name: String,
    n_features: usize,
    classes: Option<Vec<String>>,
    tree: Tree,
}

impl TryFrom<DecisionTreeJson> for DecisionTree {
    type Error = ModelError;

    fn try_from(parsed: DecisionTreeJson) -> Result<Self, Self::Error> {
        let leaf_width = parsed.classes.as_ref().map(Vec::len);
        if leaf_width == Some(0) {
            return Err(ModelError::Invalid("empty class list".to_string()));
        }
        Ok(Self {
            tree: Tree::validate(parsed.tree, parsed.n_features, leaf_width)?,
            name: parsed.model_name,
            n_features: parsed.n_features,
            classes: parsed.classes,
        })
    }
}

impl PredictionModel for DecisionTree {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &Array1<f64>) -> Result<Prediction, ModelError> {
        self.check_dimensions(features)?;
        let leaf = self.tree.leaf(features)?;
        Ok(match &self.classes {
            Some(classes) => label_for(classes, leaf),
            None => Prediction::Value(leaf[0]),
        })
    }
}

/// Bagged ensemble of trees
///
/// Regressors average the leaf targets. Classifiers average the per-tree
/// class distributions and return the most probable label.
#[derive(Debug, Clone)]
pub struct RandomForest {
    name: String,
    n_features: usize,
    classes: Option<Vec<String>>,
    trees: Vec<Tree>,
}

impl TryFrom<RandomForestJson> for RandomForest {
    type Error = ModelError;

    fn try_from(parsed: RandomForestJson) -> Result<Self, Self::Error> {
        if parsed.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".to_string()));
        }
        let leaf_width = parsed.classes.as_ref().map(Vec::len);
        if leaf_width == Some(0) {
            return Err(ModelError::Invalid("empty class list".to_string()));
        }
        let trees = parsed
            .trees
            .into_iter()
            .map(|tree| Tree::validate(tree, parsed.n_features, leaf_width))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: parsed.model_name,
            n_features: parsed.n_features,
            classes: parsed.classes,
            trees,
        })
    }
}

impl PredictionModel for RandomForest {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    #[allow(clippy::cast_precision_loss)]
    fn predict(&self, features: &Array1<f64>) -> Result<Prediction, ModelError> {
        self.check_dimensions(features)?;
        let n_trees = self.trees.len() as f64;

        match &self.classes {
            Some(classes) => {
                let mut proba = vec![0.0; classes.len()];
                for tree in &self.trees {
                    let leaf = tree.leaf(features)?;
                    let total: f64 = leaf.iter().sum();
                    if total > 0.0 {
                        for (p, w) in proba.iter_mut().zip(leaf) {
                            *p += w / total;
                        }
                    }
                }
                Ok(label_for(classes, &proba))
            }
            None => {
                let mut sum = 0.0;
                for tree in &self.trees {
                    sum += tree.leaf(features)?[0];
                }
                Ok(Prediction::Value(sum / n_trees))
            }
        }
    }
}
