//! Decision tree structures for symptom classification
//!
//! Nodes are stored in a flat vector with node 0 as the root. Split nodes
//! compare one presence feature against an integer threshold and go left
//! when `feature <= threshold`. Leaves keep the per-class sample counts seen
//! during training.

use serde::{Deserialize, Serialize};

use crate::errors::{AiCoreError, Result};

/// A decision tree node (split or leaf)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Internal node
    Split {
        /// Feature index to split on
        feature_idx: usize,
        /// Values `<= threshold` go left
        threshold: u8,
        left: usize,
        right: usize,
    },
    /// Terminal node
    Leaf {
        /// Training samples per class that reached this leaf
        class_counts: Vec<u32>,
    },
}

impl Node {
    /// Create a new split node
    pub fn split(feature_idx: usize, threshold: u8, left: usize, right: usize) -> Self {
        Node::Split {
            feature_idx,
            threshold,
            left,
            right,
        }
    }

    /// Create a new leaf node
    pub fn leaf(class_counts: Vec<u32>) -> Self {
        Node::Leaf { class_counts }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Majority class of a leaf; ties resolve to the lowest index
    pub fn majority_class(&self) -> Option<usize> {
        match self {
            Node::Leaf { class_counts } => {
                let mut best: Option<(usize, u32)> = None;
                for (class, &count) in class_counts.iter().enumerate() {
                    if best.map_or(true, |(_, best_count)| count > best_count) {
                        best = Some((class, count));
                    }
                }
                best.map(|(class, _)| class)
            }
            Node::Split { .. } => None,
        }
    }
}

/// Trained classification tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DecisionTree {
    /// Width of the feature vectors the tree was trained on
    pub n_features: usize,
    /// Number of label classes
    pub n_classes: usize,
    /// Tree nodes (node 0 is the root)
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    pub fn new(n_features: usize, n_classes: usize, nodes: Vec<Node>) -> Self {
        Self {
            n_features,
            n_classes,
            nodes,
        }
    }

    /// Predict the class index for a presence vector
    pub fn predict(&self, features: &[u8]) -> Result<usize> {
        if features.len() != self.n_features {
            return Err(AiCoreError::FeatureLengthMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut idx = 0usize;
        // A well-formed tree reaches a leaf in at most `nodes.len()` steps.
        for _ in 0..=self.nodes.len() {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| AiCoreError::InvalidModel(format!("node {idx} does not exist")))?;

            match node {
                Node::Leaf { .. } => {
                    return node.majority_class().ok_or_else(|| {
                        AiCoreError::InvalidModel(format!("leaf {idx} has no class counts"))
                    });
                }
                Node::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature_idx).ok_or_else(|| {
                        AiCoreError::InvalidModel(format!(
                            "node {idx} splits on missing feature {feature_idx}"
                        ))
                    })?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
            }
        }

        Err(AiCoreError::InvalidModel(
            "traversal did not reach a leaf".to_string(),
        ))
    }

    /// Validate tree structure
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(AiCoreError::InvalidModel("tree has no nodes".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature_idx,
                    left,
                    right,
                    ..
                } => {
                    if *feature_idx >= self.n_features {
                        return Err(AiCoreError::InvalidModel(format!(
                            "node {i} splits on feature {feature_idx}, model has {}",
                            self.n_features
                        )));
                    }
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(AiCoreError::InvalidModel(format!(
                                "node {i} has invalid child {child}"
                            )));
                        }
                    }
                }
                Node::Leaf { class_counts } => {
                    if class_counts.len() != self.n_classes {
                        return Err(AiCoreError::InvalidModel(format!(
                            "leaf {i} has {} class counts, model has {} classes",
                            class_counts.len(),
                            self.n_classes
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // if feature[0] <= 0 -> class 1, else class 0
    fn stump() -> DecisionTree {
        DecisionTree::new(
            2,
            2,
            vec![
                Node::split(0, 0, 1, 2),
                Node::leaf(vec![1, 9]),
                Node::leaf(vec![7, 2]),
            ],
        )
    }

    #[test]
    fn test_stump_prediction() {
        let tree = stump();
        assert_eq!(tree.predict(&[0, 1]).unwrap(), 1);
        assert_eq!(tree.predict(&[1, 0]).unwrap(), 0);
    }

    #[test]
    fn test_length_mismatch() {
        let tree = stump();
        assert!(matches!(
            tree.predict(&[0]),
            Err(AiCoreError::FeatureLengthMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_majority_tie_breaks_low() {
        let leaf = Node::leaf(vec![0, 4, 4]);
        assert_eq!(leaf.majority_class(), Some(1));
        assert_eq!(Node::split(0, 0, 1, 2).majority_class(), None);
    }

    #[test]
    fn test_validation() {
        assert!(stump().validate().is_ok());

        let bad_child = DecisionTree::new(
            2,
            2,
            vec![Node::split(0, 0, 5, 2), Node::leaf(vec![1, 0]), Node::leaf(vec![0, 1])],
        );
        assert!(bad_child.validate().is_err());

        let bad_feature = DecisionTree::new(
            1,
            2,
            vec![Node::split(3, 0, 1, 2), Node::leaf(vec![1, 0]), Node::leaf(vec![0, 1])],
        );
        assert!(bad_feature.validate().is_err());

        let bad_leaf = DecisionTree::new(1, 3, vec![Node::leaf(vec![1, 0])]);
        assert!(bad_leaf.validate().is_err());
    }

    #[test]
    fn test_cycle_is_reported_not_looped() {
        let cyclic = DecisionTree::new(1, 1, vec![Node::split(0, 0, 0, 0)]);
        assert!(cyclic.predict(&[0]).is_err());
    }

    #[test]
    fn test_shape_helpers() {
        let tree = stump();
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(stump()).unwrap();
        assert_eq!(json["nodes"][0]["kind"], "split");
        assert_eq!(json["nodes"][1]["kind"], "leaf");
        let back: DecisionTree = serde_json::from_value(json).unwrap();
        assert_eq!(back, stump());
    }
}
