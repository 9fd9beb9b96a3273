//! Unoptimized branch & bound.
use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::bnb::{without_feature, BnbEngine, SearchStats};
use crate::search::{check_run_arguments, SearchObserver, SelectionAlgorithm};

/// Branch & bound with children visited in plain pool order and every
/// child's score evaluated explicitly before the prune decision.
///
/// Exact under the monotonicity assumption; the baseline the ordered
/// variants improve on.
#[derive(Default)]
pub struct BasicBranchAndBound {
    best_features: Vec<usize>,
    bound: f64,
    stats: SearchStats,
    observer: Option<Box<dyn SearchObserver>>,
}

impl BasicBranchAndBound {
    pub fn new() -> Self {
        BasicBranchAndBound {
            best_features: Vec::new(),
            bound: f64::NEG_INFINITY,
            stats: SearchStats::default(),
            observer: None,
        }
    }

    /// Attach an observer that receives a progress fraction every time a
    /// leaf is evaluated or a subtree is cut off.
    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.observer = Some(observer);
    }

    /// The criterion value of the best subset found.
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// The number of criterion evaluations during the last run.
    pub fn num_evaluations(&self) -> u64 {
        self.stats.evaluations
    }

    /// Leaf accounting for the last run.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

fn search(
    engine: &mut BnbEngine,
    criterion: &mut dyn CriterionFunction,
    level: usize,
    candidate: &[usize],
) -> Result<(), SelectionError> {
    let n_children = engine.children_count(level);

    if n_children == 1 {
        // No more branching down to the leaf: the leaf keeps exactly the
        // candidate features outside the pool.
        let leaf = engine.leaf_under(candidate);
        let value = engine.evaluate(criterion, &leaf)?;
        engine.record_leaf(value, leaf);
        engine.count_leaf();
        return Ok(());
    }

    let descendants: Vec<usize> = engine.pool.iter().take(n_children).copied().collect();
    for feature in &descendants {
        engine.pool.remove(feature);
    }

    for &child in descendants.iter().rev() {
        let config = without_feature(candidate, child);
        let value = engine.evaluate(criterion, &config)?;

        if value > engine.bound {
            // subtree cannot be cut off
            if level + 1 == engine.removal_count() {
                engine.record_leaf(value, config);
                engine.count_leaf();
            } else {
                let pool_before = engine.pool.clone();
                search(engine, criterion, level + 1, &config)?;
                debug_assert_eq!(pool_before, engine.pool, "pool not restored after child");
            }
        } else {
            engine.count_pruned_subtree(level)?;
        }

        engine.pool.insert(child);
    }

    Ok(())
}

impl SelectionAlgorithm for BasicBranchAndBound {
    fn run(
        &mut self,
        data: &DataSet,
        criterion: &mut dyn CriterionFunction,
        drop_count: usize,
    ) -> Result<(), SelectionError> {
        let dimension = data.dimension();
        check_run_arguments(dimension, drop_count)?;

        criterion.initialize(dimension, data);

        let mut engine = BnbEngine::new(
            dimension,
            dimension - drop_count,
            self.observer.as_mut().map(|o| &mut **o as &mut dyn SearchObserver),
        )?;
        let candidate: Vec<usize> = (0..dimension).collect();

        if drop_count == 0 {
            let value = engine.evaluate_full(criterion)?;
            engine.record_leaf(value, candidate);
            engine.count_leaf();
        } else {
            search(&mut engine, criterion, 0, &candidate)?;
        }
        engine.finish();

        self.bound = engine.bound;
        self.best_features = engine.best_features;
        self.stats = engine.stats;

        log::debug!(
            "Basic B&B: bound {} after {} evaluations ({} leaves evaluated, {} pruned)",
            self.bound,
            self.stats.evaluations,
            self.stats.leaves_evaluated,
            self.stats.leaves_pruned
        );

        Ok(())
    }

    fn feature_vector(&self) -> &[usize] {
        &self.best_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSet;

    struct IndexSum;

    impl CriterionFunction for IndexSum {
        fn initialize(&mut self, _dimension: usize, _data: &DataSet) {}

        fn full_value(&mut self) -> f64 {
            0.0
        }

        fn value(&mut self, features: &[usize]) -> f64 {
            features.iter().map(|&f| (f + 1) as f64).sum()
        }
    }

    #[test]
    fn test_pool_restored_after_run() {
        let mut engine = BnbEngine::new(9, 4, None).unwrap();
        let candidate: Vec<usize> = (0..9).collect();
        search(&mut engine, &mut IndexSum, 0, &candidate).unwrap();

        // strict push/pop symmetry leaves the pool exactly as it started
        let full: std::collections::BTreeSet<usize> = (0..9).collect();
        assert_eq!(engine.pool, full);
        assert_eq!(
            engine.stats.leaves_evaluated + engine.stats.leaves_pruned,
            engine.stats.leaves_total
        );
    }

    #[test]
    fn test_finds_optimum() {
        let data = DataSet::empty(9);
        let mut search = BasicBranchAndBound::new();
        search.run(&data, &mut IndexSum, 4).unwrap();

        assert_eq!(search.feature_vector(), &[4, 5, 6, 7, 8]);
        assert_eq!(search.bound(), 35.0);
    }

    #[test]
    fn test_drop_zero_returns_full_set() {
        let data = DataSet::empty(5);
        let mut search = BasicBranchAndBound::new();
        search.run(&data, &mut IndexSum, 0).unwrap();
        assert_eq!(search.feature_vector(), &[0, 1, 2, 3, 4]);
        assert_eq!(search.stats().leaves_total, 1);
    }
}
