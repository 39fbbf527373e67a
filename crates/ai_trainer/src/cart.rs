//! CART (Classification and Regression Tree) builder
//!
//! Exact-greedy classification tree induction minimizing Gini impurity.
//! Split scores are compared as exact integer fractions so that the same
//! data and seed always produce the same tree.

use agrodx_ai_core::{DecisionTree, Node};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::deterministic::{feature_order, SplitTieBreaker, DEFAULT_SEED};
use crate::errors::TrainerError;

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    /// `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Permutes feature visitation order, which decides ties
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: DEFAULT_SEED,
        }
    }
}

/// Purity of a candidate split: `sum_child(sum_k count_k^2 / n_child)`.
/// Larger is better; it equals the weighted Gini decrease up to a constant.
#[derive(Debug, Clone, Copy)]
struct SplitScore {
    numerator: u128,
    denominator: u128,
}

impl SplitScore {
    fn new(left: &[u32], right: &[u32]) -> Self {
        let n_left: u128 = left.iter().map(|&c| c as u128).sum();
        let n_right: u128 = right.iter().map(|&c| c as u128).sum();
        let sq_left: u128 = left.iter().map(|&c| (c as u128) * (c as u128)).sum();
        let sq_right: u128 = right.iter().map(|&c| (c as u128) * (c as u128)).sum();

        Self {
            numerator: sq_left * n_right + sq_right * n_left,
            denominator: n_left * n_right,
        }
    }
}

impl PartialEq for SplitScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SplitScore {}

impl PartialOrd for SplitScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SplitScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match (
            self.numerator.checked_mul(other.denominator),
            other.numerator.checked_mul(self.denominator),
        ) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            _ => compare_fractions(
                self.numerator,
                self.denominator,
                other.numerator,
                other.denominator,
            ),
        }
    }
}

/// Exact `a/b` vs `c/d` by continued-fraction expansion, without products.
/// Denominators must be non-zero.
fn compare_fractions(mut a: u128, mut b: u128, mut c: u128, mut d: u128) -> Ordering {
    loop {
        let (qa, qc) = (a / b, c / d);
        if qa != qc {
            return qa.cmp(&qc);
        }
        let (ra, rc) = (a % b, c % d);
        match (ra == 0, rc == 0) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            // ra/b vs rc/d orders the same as d/rc vs b/ra
            (false, false) => {
                (a, b, c, d) = (d, rc, b, ra);
            }
        }
    }
}

/// Split candidate with score and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: u8,
    score: SplitScore,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn beats(&self, other: &SplitCandidate) -> bool {
        match self.score.cmp(&other.score) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.tie_breaker < other.tie_breaker,
        }
    }
}

/// Build a classification tree using exact-greedy CART
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [Vec<u8>],
    targets: &'a [usize],
    n_classes: usize,
    feature_count: usize,
    /// Feature indices in visitation order
    order: Vec<usize>,
}

impl<'a> CartBuilder<'a> {
    pub fn new(
        features: &'a [Vec<u8>],
        targets: &'a [usize],
        n_classes: usize,
        config: TreeConfig,
    ) -> Result<Self, TrainerError> {
        if features.len() != targets.len() {
            return Err(TrainerError::Training(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }
        if features.is_empty() {
            return Err(TrainerError::Training("no training samples".to_string()));
        }
        if let Some(&bad) = targets.iter().find(|&&t| t >= n_classes) {
            return Err(TrainerError::Training(format!(
                "target {bad} outside {n_classes} classes"
            )));
        }

        let feature_count = features[0].len();
        if features.iter().any(|row| row.len() != feature_count) {
            return Err(TrainerError::Training(
                "feature rows have inconsistent lengths".to_string(),
            ));
        }

        let order = feature_order(feature_count, config.seed);

        Ok(Self {
            config,
            features,
            targets,
            n_classes,
            feature_count,
            order,
        })
    }

    /// Build tree and return it
    pub fn build(&self) -> DecisionTree {
        let mut nodes = Vec::new();
        let indices: Vec<usize> = (0..self.targets.len()).collect();

        self.build_node(&indices, 0, &mut nodes);

        DecisionTree::new(self.feature_count, self.n_classes, nodes)
    }

    /// Recursively build tree nodes, returning the index of the new node
    fn build_node(&self, indices: &[usize], depth: usize, nodes: &mut Vec<Node>) -> usize {
        let current_idx = nodes.len();
        let counts = self.class_counts(indices);

        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);

        if is_pure || depth_reached || indices.len() < self.config.min_samples_split {
            nodes.push(Node::leaf(counts));
            return current_idx;
        }

        let split = match self.find_best_split(indices) {
            Some(s) => s,
            None => {
                // Every feature is constant on these samples
                nodes.push(Node::leaf(counts));
                return current_idx;
            }
        };

        let (left_indices, right_indices) =
            self.split_samples(indices, split.feature_idx, split.threshold);

        // Reserve space for current node; children are patched in below
        nodes.push(Node::split(split.feature_idx, split.threshold, 0, 0));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes);

        nodes[current_idx] = Node::split(split.feature_idx, split.threshold, left_idx, right_idx);

        current_idx
    }

    /// Find best split using exact-greedy search
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let mut best_split: Option<SplitCandidate> = None;

        for (rank, &feature_idx) in self.order.iter().enumerate() {
            for threshold in self.candidate_thresholds(indices, feature_idx) {
                let (left, right) = self.split_samples(indices, feature_idx, threshold);

                if left.len() < self.config.min_samples_leaf
                    || right.len() < self.config.min_samples_leaf
                {
                    continue;
                }

                let candidate = SplitCandidate {
                    feature_idx,
                    threshold,
                    score: SplitScore::new(&self.class_counts(&left), &self.class_counts(&right)),
                    tie_breaker: SplitTieBreaker::new(rank, threshold),
                };

                best_split = match best_split {
                    Some(current) if !candidate.beats(&current) => Some(current),
                    _ => Some(candidate),
                };
            }
        }

        best_split
    }

    /// Every distinct value except the largest; splitting there would
    /// leave the right side empty.
    fn candidate_thresholds(&self, indices: &[usize], feature_idx: usize) -> Vec<u8> {
        let values: BTreeSet<u8> = indices
            .iter()
            .map(|&idx| self.features[idx][feature_idx])
            .collect();

        let mut thresholds: Vec<u8> = values.into_iter().collect();
        thresholds.pop();
        thresholds
    }

    /// Split samples based on threshold
    fn split_samples(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: u8,
    ) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .partition(|&&idx| self.features[idx][feature_idx] <= threshold)
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<u32> {
        let mut counts = vec![0u32; self.n_classes];
        for &idx in indices {
            counts[self.targets[idx]] += 1;
        }
        counts
    }
}
