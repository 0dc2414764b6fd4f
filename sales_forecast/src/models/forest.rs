//! Random forest regressor
//!
//! Bagged variance-reduction regression trees with per-split feature
//! subsampling. Bootstrap sampling and feature choice are driven by a
//! seeded generator, so training is deterministic for a given seed.

use crate::error::{ForecastError, Result};
use crate::models::{Regressor, TrainedRegressor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random forest configuration
#[derive(Debug, Clone)]
pub struct RandomForest {
    name: String,
    n_trees: usize,
    max_depth: usize,
    min_samples_split: usize,
    seed: u64,
}

/// Trained random forest
#[derive(Debug)]
pub struct TrainedRandomForest {
    name: String,
    trees: Vec<TreeNode>,
}

/// One node of a fitted regression tree
#[derive(Debug)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl RandomForest {
    /// Create a new random forest model
    pub fn new(
        n_trees: usize,
        max_depth: usize,
        min_samples_split: usize,
        seed: u64,
    ) -> Result<Self> {
        if n_trees == 0 {
            return Err(ForecastError::InvalidInput(
                "Forest needs at least one tree".to_string(),
            ));
        }
        if max_depth == 0 {
            return Err(ForecastError::InvalidInput(
                "Tree depth must be at least 1".to_string(),
            ));
        }
        if min_samples_split < 2 {
            return Err(ForecastError::InvalidInput(
                "Nodes need at least 2 samples to split".to_string(),
            ));
        }

        Ok(Self {
            name: "random_forest".to_string(),
            n_trees,
            max_depth,
            min_samples_split,
            seed,
        })
    }

    fn build_tree(
        &self,
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> TreeNode {
        let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64;

        if depth >= self.max_depth || indices.len() < self.min_samples_split {
            return TreeNode::Leaf { value: mean };
        }

        let n_features = rows[0].len();
        let mtry = ((n_features as f64).sqrt().ceil() as usize).max(1);

        let mut best: Option<(usize, f64, f64)> = None;

        for _ in 0..mtry {
            let feature = rng.gen_range(0..n_features);

            let mut values: Vec<f64> = indices.iter().map(|&i| rows[i][feature]).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();
            if values.len() < 2 {
                continue;
            }

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let score = split_sse(rows, targets, indices, feature, threshold);
                if let Some(score) = score {
                    if best.map_or(true, |(_, _, s)| score < s) {
                        best = Some((feature, threshold, score));
                    }
                }
            }
        }

        let (feature, threshold, _) = match best {
            Some(found) => found,
            None => return TreeNode::Leaf { value: mean },
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| rows[i][feature] <= threshold);

        if left_idx.is_empty() || right_idx.is_empty() {
            return TreeNode::Leaf { value: mean };
        }

        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(self.build_tree(rows, targets, &left_idx, depth + 1, rng)),
            right: Box::new(self.build_tree(rows, targets, &right_idx, depth + 1, rng)),
        }
    }
}

/// Sum of squared errors of a candidate split, or None when one side is
/// empty.
fn split_sse(
    rows: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    feature: usize,
    threshold: f64,
) -> Option<f64> {
    let mut left_sum = 0.0;
    let mut left_count = 0usize;
    let mut right_sum = 0.0;
    let mut right_count = 0usize;

    for &i in indices {
        if rows[i][feature] <= threshold {
            left_sum += targets[i];
            left_count += 1;
        } else {
            right_sum += targets[i];
            right_count += 1;
        }
    }
    if left_count == 0 || right_count == 0 {
        return None;
    }

    let left_mean = left_sum / left_count as f64;
    let right_mean = right_sum / right_count as f64;

    let mut sse = 0.0;
    for &i in indices {
        let mean = if rows[i][feature] <= threshold {
            left_mean
        } else {
            right_mean
        };
        sse += (targets[i] - mean).powi(2);
    }
    Some(sse)
}

impl TreeNode {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

impl Regressor for RandomForest {
    type Trained = TrainedRandomForest;

    fn train(&self, rows: &[Vec<f64>], targets: &[f64]) -> Result<TrainedRandomForest> {
        if rows.len() != targets.len() || rows.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Forest training needs at least 2 rows with matching targets, got {} rows and {} targets",
                rows.len(),
                targets.len()
            )));
        }

        let mut trees = Vec::with_capacity(self.n_trees);
        for t in 0..self.n_trees {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(t as u64));

            // Bootstrap sample with replacement, same size as the input.
            let sample: Vec<usize> =
                (0..rows.len()).map(|_| rng.gen_range(0..rows.len())).collect();

            trees.push(self.build_tree(rows, targets, &sample, 0, &mut rng));
        }

        Ok(TrainedRandomForest {
            name: self.name.clone(),
            trees,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRegressor for TrainedRandomForest {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        Ok(rows
            .iter()
            .map(|row| {
                self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>()
                    / self.trees.len() as f64
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
