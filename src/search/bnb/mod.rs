//! Branch & bound subset searches.
//!
//! All variants share the same tree shape: the root holds the full feature
//! set, every edge removes exactly one feature, and removed indices are
//! drawn from an ordered pool so that each subset of the target size is
//! reached by exactly one leaf. A node whose score cannot beat the current
//! bound is cut off, and the leaves below it are accounted for with a
//! binomial shortcut instead of being visited. Pruning is admissible only
//! if the criterion is monotone non-increasing under feature removal.
//!
//! The shared pool and progress bookkeeping lives in [`BnbEngine`]; each
//! variant contributes its own child ordering and evaluation strategy.
pub mod basic;
pub mod fast;
pub mod improved;
pub mod partial;
pub mod recursive;

pub use basic::BasicBranchAndBound;
pub use fast::FastBranchAndBound;
pub use improved::ImprovedBranchAndBound;
pub use partial::PartialPredictionBranchAndBound;
pub use recursive::RecursiveBranchAndBound;

use std::collections::BTreeSet;

use crate::criterion::CriterionFunction;
use crate::error::SelectionError;
use crate::math::binomial;
use crate::search::{checked_value, SearchObserver};

/// Leaf and evaluation accounting for one completed branch & bound run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Criterion evaluations (including evaluations of inner nodes).
    pub evaluations: u64,
    /// Leaves whose subsets were explicitly scored.
    pub leaves_evaluated: u64,
    /// Leaves accounted for through the binomial pruning shortcut.
    pub leaves_pruned: u64,
    /// C(dimension, target_size); the run is complete when
    /// `leaves_evaluated + leaves_pruned` equals this.
    pub leaves_total: u64,
}

/// Shared search state for one branch & bound run.
///
/// The pool is the bookkeeping structure that controls how many children
/// each node spawns. Features are removed from it before recursing into the
/// corresponding child and re-inserted afterwards; the set must be
/// bit-identical before and after every child visit, which the variants
/// check with debug assertions on each return path.
pub(crate) struct BnbEngine<'a> {
    pub pool: BTreeSet<usize>,
    pub dimension: usize,
    pub target_size: usize,
    pub bound: f64,
    pub best_features: Vec<usize>,
    pub stats: SearchStats,
    observer: Option<&'a mut dyn SearchObserver>,
}

impl<'a> BnbEngine<'a> {
    pub fn new(
        dimension: usize,
        target_size: usize,
        observer: Option<&'a mut dyn SearchObserver>,
    ) -> Result<Self, SelectionError> {
        let leaves_total = binomial(dimension as u64, target_size as u64)?;

        Ok(BnbEngine {
            pool: (0..dimension).collect(),
            dimension,
            target_size,
            bound: f64::NEG_INFINITY,
            best_features: Vec::new(),
            stats: SearchStats {
                leaves_total,
                ..SearchStats::default()
            },
            observer,
        })
    }

    /// Total number of removals on any root-to-leaf path.
    pub fn removal_count(&self) -> usize {
        self.dimension - self.target_size
    }

    /// Number of children a node at `level` spawns. Summed over a level
    /// this telescopes to exactly C(dimension, target_size) leaves.
    pub fn children_count(&self, level: usize) -> usize {
        self.pool.len() + self.target_size + level + 1 - self.dimension
    }

    /// Evaluate a subset, counting the evaluation and rejecting NaN.
    pub fn evaluate(
        &mut self,
        criterion: &mut dyn CriterionFunction,
        features: &[usize],
    ) -> Result<f64, SelectionError> {
        self.stats.evaluations += 1;
        checked_value(criterion, features)
    }

    /// Evaluate the full feature set.
    pub fn evaluate_full(
        &mut self,
        criterion: &mut dyn CriterionFunction,
    ) -> Result<f64, SelectionError> {
        self.stats.evaluations += 1;
        let value = criterion.full_value();
        if value.is_nan() {
            Err(SelectionError::NumericFailure((0..self.dimension).collect()))
        } else {
            Ok(value)
        }
    }

    /// Raise the bound if `value` beats it.
    pub fn record_leaf(&mut self, value: f64, config: Vec<usize>) {
        if value > self.bound {
            self.bound = value;
            self.best_features = config;
        }
    }

    /// Account for one explicitly evaluated leaf.
    pub fn count_leaf(&mut self) {
        self.stats.leaves_evaluated += 1;
        self.notify_progress();
    }

    /// Account for every leaf below a subtree cut off at `level` without
    /// visiting them: the subtree still had to place
    /// `removal_count() - level - 1` removals among the pooled features.
    pub fn count_pruned_subtree(&mut self, level: usize) -> Result<(), SelectionError> {
        let k = (self.removal_count() - level - 1) as u64;
        self.stats.leaves_pruned += binomial(self.pool.len() as u64, k)?;
        self.notify_progress();
        Ok(())
    }

    /// The leaf below `candidate` on the single-child chain: every pooled
    /// feature is still to be removed, so the leaf keeps exactly the
    /// candidate features that are not in the pool.
    pub fn leaf_under(&self, candidate: &[usize]) -> Vec<usize> {
        candidate
            .iter()
            .copied()
            .filter(|f| !self.pool.contains(f))
            .collect()
    }

    fn notify_progress(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            let done = self.stats.leaves_evaluated + self.stats.leaves_pruned;
            observer.progress(done as f64 / self.stats.leaves_total as f64);
        }
    }

    /// Consistency checks after a successful search.
    pub fn finish(&self) {
        debug_assert_eq!(self.pool.len(), self.dimension, "pool not fully restored");
        debug_assert_eq!(
            self.stats.leaves_evaluated + self.stats.leaves_pruned,
            self.stats.leaves_total,
            "leaf accounting incomplete"
        );
    }
}

/// Per-feature running mean of the criterion decrease caused by removing
/// that feature, collected over one run. Shared by the prediction-based
/// variants.
pub(crate) struct Contributions {
    pub mean: Vec<f64>,
    pub count: Vec<u64>,
}

impl Contributions {
    pub fn new(dimension: usize) -> Self {
        Contributions {
            mean: vec![0.0; dimension],
            count: vec![0; dimension],
        }
    }

    pub fn update(&mut self, feature: usize, decrease: f64) {
        let n = self.count[feature];
        self.mean[feature] = (self.mean[feature] * n as f64 + decrease) / (n + 1) as f64;
        self.count[feature] = n + 1;
    }
}

/// A candidate config with one feature removed, order preserved.
pub(crate) fn without_feature(candidate: &[usize], feature: usize) -> Vec<usize> {
    candidate
        .iter()
        .copied()
        .filter(|&f| f != feature)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_count_telescopes_at_root() {
        let engine = BnbEngine::new(10, 4, None).unwrap();
        // root spawns target_size + 1 children
        assert_eq!(engine.children_count(0), 5);
        assert_eq!(engine.removal_count(), 6);
        assert_eq!(engine.stats.leaves_total, 210);
    }

    #[test]
    fn test_without_feature_preserves_order() {
        assert_eq!(without_feature(&[0, 3, 5, 9], 5), vec![0, 3, 9]);
        assert_eq!(without_feature(&[0, 3, 5, 9], 0), vec![3, 5, 9]);
    }

    #[test]
    fn test_leaf_under_skips_pooled_features() {
        let mut engine = BnbEngine::new(6, 2, None).unwrap();
        engine.pool = [1, 4].into_iter().collect();
        assert_eq!(engine.leaf_under(&[0, 1, 3, 4]), vec![0, 3]);
    }
}
