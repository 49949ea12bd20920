//! Regression trees grown on gradient statistics
//!
//! Trees are fit to first-order gradients of the squared loss with unit
//! hessians, using the regularized split gain
//! `G_L^2/(H_L+lambda) + G_R^2/(H_R+lambda) - G^2/(H+lambda)` and leaf weights
//! `-G/(H+lambda)`.

/// Growth limits and regularization for a single tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    /// L2 penalty on leaf weights
    pub lambda: f64,
    /// Minimum hessian sum on each side of a split
    pub min_child_weight: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 5,
            lambda: 1.0,
            min_child_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted regression tree
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    root: Node,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    /// Grow a tree on feature rows and their loss gradients
    pub fn fit(rows: &[Vec<f64>], gradients: &[f64], params: &TreeParams) -> Self {
        let indices: Vec<usize> = (0..rows.len()).collect();
        Self {
            root: grow(rows, gradients, indices, 0, params),
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(weight) => return *weight,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] < *threshold { left } else { right };
                }
            }
        }
    }

    /// Number of leaves, mostly useful for diagnostics
    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf(_) => 1,
                Node::Split { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

fn score(gradient_sum: f64, hessian_sum: f64, lambda: f64) -> f64 {
    gradient_sum.powi(2) / (hessian_sum + lambda)
}

fn grow(
    rows: &[Vec<f64>],
    gradients: &[f64],
    indices: Vec<usize>,
    depth: usize,
    params: &TreeParams,
) -> Node {
    let gradient_sum: f64 = indices.iter().map(|&i| gradients[i]).sum();
    let hessian_sum = indices.len() as f64;
    let leaf = Node::Leaf(-gradient_sum / (hessian_sum + params.lambda));

    if depth >= params.max_depth || indices.len() < 2 {
        return leaf;
    }

    let Some(split) = best_split(rows, gradients, &indices, gradient_sum, params) else {
        return leaf;
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| rows[i][split.feature] < split.threshold);

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(grow(rows, gradients, left, depth + 1, params)),
        right: Box::new(grow(rows, gradients, right, depth + 1, params)),
    }
}

fn best_split(
    rows: &[Vec<f64>],
    gradients: &[f64],
    indices: &[usize],
    gradient_sum: f64,
    params: &TreeParams,
) -> Option<SplitCandidate> {
    let width = rows[indices[0]].len();
    let hessian_sum = indices.len() as f64;
    let parent_score = score(gradient_sum, hessian_sum, params.lambda);

    let mut best: Option<SplitCandidate> = None;
    let mut sorted = indices.to_vec();
    for feature in 0..width {
        sorted.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        let mut left_gradient = 0.0;
        for k in 1..sorted.len() {
            left_gradient += gradients[sorted[k - 1]];
            let lower = rows[sorted[k - 1]][feature];
            let upper = rows[sorted[k]][feature];
            if upper <= lower {
                continue;
            }

            let left_hessian = k as f64;
            let right_hessian = hessian_sum - left_hessian;
            if left_hessian < params.min_child_weight || right_hessian < params.min_child_weight {
                continue;
            }

            let gain = score(left_gradient, left_hessian, params.lambda)
                + score(gradient_sum - left_gradient, right_hessian, params.lambda)
                - parent_score;
            if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (lower + upper) / 2.0,
                    gain,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_separates_step_function() {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..20).map(|i| if i < 10 { 0.0 } else { 10.0 }).collect();
        // Gradients of the squared loss at a zero prediction
        let gradients: Vec<f64> = targets.iter().map(|t| -t).collect();

        let params = TreeParams {
            max_depth: 1,
            lambda: 0.0,
            min_child_weight: 1.0,
        };
        let tree = RegressionTree::fit(&rows, &gradients, &params);

        assert_eq!(tree.leaf_count(), 2);
        assert!((tree.predict(&[3.0]) - 0.0).abs() < 1e-9);
        assert!((tree.predict(&[15.0]) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_feature_yields_single_leaf() {
        let rows: Vec<Vec<f64>> = (0..5).map(|_| vec![1.0]).collect();
        let gradients = vec![-1.0, -2.0, -3.0, -4.0, -5.0];
        let tree = RegressionTree::fit(&rows, &gradients, &TreeParams::default());

        assert_eq!(tree.leaf_count(), 1);
        // -G / (H + lambda) = 15 / 6
        assert!((tree.predict(&[1.0]) - 2.5).abs() < 1e-9);
    }
}
