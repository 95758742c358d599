//! Arena-allocated regression tree shared by the forest and boosting surrogates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rng_util;

/// How many features are considered at each split.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MaxFeatures {
    /// Every feature.
    #[default]
    All,
    /// `ceil(sqrt(n_features))` features.
    Sqrt,
    /// A fixed fraction of the features (at least one).
    Fraction(f64),
}

impl MaxFeatures {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            Self::All => n_features,
            Self::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            Self::Fraction(f) => (f * n_features as f64).ceil() as usize,
        };
        k.max(1).min(n_features)
    }
}

/// Threshold search at each node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Splitter {
    /// Best midpoint between consecutive distinct values (CART).
    Best,
    /// One uniform random threshold per feature (extremely randomized trees).
    Random,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TreeParams {
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) max_features: MaxFeatures,
    pub(crate) splitter: Splitter,
}

#[derive(Clone, Debug)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree.
#[derive(Clone, Debug)]
pub(crate) struct RegressionTree {
    nodes: Vec<TreeNode>,
}

/// Candidate split found for one feature.
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl RegressionTree {
    /// Fit on the rows of `data` listed in `indices` (repeats allowed, as in a
    /// bootstrap sample). `indices` must be non-empty.
    pub(crate) fn fit(
        data: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        params: &TreeParams,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build_node(data, targets, indices.to_vec(), 0, params, rng);
        tree
    }

    #[allow(clippy::cast_precision_loss)]
    fn build_node(
        &mut self,
        data: &[Vec<f64>],
        targets: &[f64],
        indices: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        rng: &mut fastrand::Rng,
    ) -> usize {
        let n = indices.len();
        let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / n as f64;

        let n_features = data.get(indices[0]).map_or(0, Vec::len);
        let exhausted = n < params.min_samples_split
            || n < 2 * params.min_samples_leaf
            || params.max_depth.is_some_and(|d| depth >= d)
            || n_features == 0;
        #[allow(clippy::float_cmp)]
        let pure = indices.iter().all(|&i| targets[i] == targets[indices[0]]);

        let best = if exhausted || pure {
            None
        } else {
            let k = params.max_features.resolve(n_features);
            rng_util::partial_shuffle(n_features, k, rng)
                .into_iter()
                .filter_map(|feature| match params.splitter {
                    Splitter::Best => best_split(data, targets, &indices, feature, params),
                    Splitter::Random => random_split(data, targets, &indices, feature, params, rng),
                })
                .fold(None, |acc: Option<SplitCandidate>, cand| match acc {
                    Some(a) if a.score >= cand.score => Some(a),
                    _ => Some(cand),
                })
        };

        let Some(split) = best else {
            return self.push_leaf(mean);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| data[i][split.feature] <= split.threshold);
        if left_indices.is_empty() || right_indices.is_empty() {
            return self.push_leaf(mean);
        }

        // Placeholder, replaced by the split once both children exist.
        let node_idx = self.push_leaf(mean);
        let left = self.build_node(data, targets, left_indices, depth + 1, params, rng);
        let right = self.build_node(data, targets, right_indices, depth + 1, params, rng);
        self.nodes[node_idx] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    fn push_leaf(&mut self, value: f64) -> usize {
        self.nodes.push(TreeNode::Leaf { value });
        self.nodes.len() - 1
    }

    /// Index of the leaf `x` falls into.
    pub(crate) fn leaf_index(&self, x: &[f64]) -> usize {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { .. } => return idx,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    pub(crate) fn predict(&self, x: &[f64]) -> f64 {
        match self.nodes[self.leaf_index(x)] {
            TreeNode::Leaf { value } => value,
            TreeNode::Split { .. } => f64::NAN,
        }
    }

    /// Overwrite the value of the leaf at `idx`.
    pub(crate) fn set_leaf_value(&mut self, idx: usize, new_value: f64) {
        if let TreeNode::Leaf { value } = &mut self.nodes[idx] {
            *value = new_value;
        }
    }

    #[cfg(test)]
    fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }
}

/// Variance-reduction score of a split, up to a per-node constant:
/// `sum_l^2 / n_l + sum_r^2 / n_r`.
#[allow(clippy::cast_precision_loss)]
fn split_score(l_sum: f64, l_n: usize, r_sum: f64, r_n: usize) -> f64 {
    l_sum * l_sum / l_n as f64 + r_sum * r_sum / r_n as f64
}

/// Scan every midpoint between consecutive distinct values of `feature`.
fn best_split(
    data: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    feature: usize,
    params: &TreeParams,
) -> Option<SplitCandidate> {
    let mut column: Vec<(f64, f64)> = indices
        .iter()
        .map(|&i| (data[i][feature], targets[i]))
        .collect();
    column.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = column.len();
    let total: f64 = column.iter().map(|(_, y)| y).sum();
    let mut l_sum = 0.0;
    let mut best: Option<SplitCandidate> = None;

    for i in 0..n - 1 {
        l_sum += column[i].1;
        let l_n = i + 1;
        let r_n = n - l_n;
        #[allow(clippy::float_cmp)]
        let tied = column[i].0 == column[i + 1].0;
        if tied || l_n < params.min_samples_leaf || r_n < params.min_samples_leaf {
            continue;
        }
        let score = split_score(l_sum, l_n, total - l_sum, r_n);
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(SplitCandidate {
                feature,
                threshold: f64::midpoint(column[i].0, column[i + 1].0),
                score,
            });
        }
    }
    best
}

/// Draw one threshold uniformly between the node's min and max of `feature`.
fn random_split(
    data: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    feature: usize,
    params: &TreeParams,
    rng: &mut fastrand::Rng,
) -> Option<SplitCandidate> {
    let (lo, hi) = indices
        .iter()
        .map(|&i| data[i][feature])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo >= hi {
        return None;
    }
    let mut threshold = rng_util::f64_range(rng, lo, hi);
    if threshold >= hi {
        threshold = lo;
    }

    let (mut l_sum, mut l_n, mut r_sum, mut r_n) = (0.0, 0usize, 0.0, 0usize);
    for &i in indices {
        if data[i][feature] <= threshold {
            l_sum += targets[i];
            l_n += 1;
        } else {
            r_sum += targets[i];
            r_n += 1;
        }
    }
    if l_n < params.min_samples_leaf.max(1) || r_n < params.min_samples_leaf.max(1) {
        return None;
    }
    Some(SplitCandidate {
        feature,
        threshold,
        score: split_score(l_sum, l_n, r_sum, r_n),
    })
}
