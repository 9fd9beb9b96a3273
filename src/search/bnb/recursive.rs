//! Branch & bound over incrementally derived criterion states.
use std::cmp::Ordering;

use crate::criterion::{CriterionFunction, CriterionState, RecursiveCriterionFunction};
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::bnb::{BnbEngine, SearchStats};
use crate::search::{check_run_arguments, SearchObserver, SelectionAlgorithm};

/// Branch & bound for criteria that can derive a child's value from an
/// algebraic snapshot of its parent instead of recomputing from scratch.
/// The tree walk is the same as the improved variant's, but every node
/// carries a [`CriterionState`] and children are scored by deriving states
/// for all pooled features. Requires a criterion whose
/// [`CriterionFunction::as_recursive`] returns `Some`; anything else is
/// rejected before the search starts.
#[derive(Default)]
pub struct RecursiveBranchAndBound {
    best_features: Vec<usize>,
    bound: f64,
    stats: SearchStats,
    observer: Option<Box<dyn SearchObserver>>,
}

struct ScoredState {
    feature: usize,
    state: Box<dyn CriterionState>,
}

fn by_value_ascending(a: &ScoredState, b: &ScoredState) -> Ordering {
    a.state
        .value()
        .partial_cmp(&b.state.value())
        .unwrap_or(Ordering::Equal)
}

fn checked_state_value(state: &dyn CriterionState) -> Result<f64, SelectionError> {
    let value = state.value();
    if value.is_nan() {
        Err(SelectionError::NumericFailure(state.config().to_vec()))
    } else {
        Ok(value)
    }
}

impl RecursiveBranchAndBound {
    pub fn new() -> Self {
        RecursiveBranchAndBound {
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

    /// The number of state derivations during the last run.
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
    criterion: &mut dyn RecursiveCriterionFunction,
    level: usize,
    parent: &dyn CriterionState,
) -> Result<(), SelectionError> {
    let n_children = engine.children_count(level);

    // Derive a state for every pooled feature; each derivation scores one
    // child subset.
    let pool: Vec<usize> = engine.pool.iter().copied().collect();
    let mut children = Vec::with_capacity(pool.len());
    for &feature in &pool {
        let state = criterion.derive_state(feature, parent);
        engine.stats.evaluations += 1;
        checked_state_value(state.as_ref())?;
        children.push(ScoredState { feature, state });
    }
    children.sort_by(by_value_ascending);

    for child in children.iter().take(n_children) {
        engine.pool.remove(&child.feature);
    }

    for child in children.drain(..).take(n_children).rev() {
        if child.state.value() > engine.bound {
            // subtree cannot be cut off
            if level + 1 == engine.removal_count() {
                engine.record_leaf(child.state.value(), child.state.config().to_vec());
                engine.count_leaf();
            } else {
                let pool_before = engine.pool.clone();
                search(engine, criterion, level + 1, child.state.as_ref())?;
                debug_assert_eq!(pool_before, engine.pool, "pool not restored after child");
            }
        } else {
            engine.count_pruned_subtree(level)?;
        }

        engine.pool.insert(child.feature);
    }

    Ok(())
}

impl SelectionAlgorithm for RecursiveBranchAndBound {
    fn run(
        &mut self,
        data: &DataSet,
        criterion: &mut dyn CriterionFunction,
        drop_count: usize,
    ) -> Result<(), SelectionError> {
        let dimension = data.dimension();
        check_run_arguments(dimension, drop_count)?;

        criterion.initialize(dimension, data);
        let criterion = criterion.as_recursive().ok_or_else(|| {
            SelectionError::InvalidConfiguration(
                "recursive branch & bound requires a criterion with derivable states".to_string(),
            )
        })?;

        let mut engine = BnbEngine::new(
            dimension,
            dimension - drop_count,
            self.observer.as_mut().map(|o| &mut **o as &mut dyn SearchObserver),
        )?;
        let root = criterion.root_state();
        engine.stats.evaluations += 1;
        let root_value = checked_state_value(root.as_ref())?;

        if drop_count == 0 {
            engine.record_leaf(root_value, root.config().to_vec());
            engine.count_leaf();
        } else {
            search(&mut engine, criterion, 0, root.as_ref())?;
        }
        engine.finish();

        self.bound = engine.bound;
        self.best_features = engine.best_features;
        self.stats = engine.stats;

        log::debug!(
            "Recursive B&B: bound {} after {} state derivations ({} leaves evaluated, {} pruned)",
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

    struct SumState {
        value: f64,
        config: Vec<usize>,
        removed: Option<usize>,
    }

    impl CriterionState for SumState {
        fn value(&self) -> f64 {
            self.value
        }

        fn config(&self) -> &[usize] {
            &self.config
        }

        fn removed_feature(&self) -> Option<usize> {
            self.removed
        }
    }

    struct RecursiveIndexSum {
        dimension: usize,
    }

    impl CriterionFunction for RecursiveIndexSum {
        fn initialize(&mut self, dimension: usize, _data: &DataSet) {
            self.dimension = dimension;
        }

        fn full_value(&mut self) -> f64 {
            (0..self.dimension).map(|f| (f + 1) as f64).sum()
        }

        fn value(&mut self, features: &[usize]) -> f64 {
            features.iter().map(|&f| (f + 1) as f64).sum()
        }

        fn as_recursive(&mut self) -> Option<&mut dyn RecursiveCriterionFunction> {
            Some(self)
        }
    }

    impl RecursiveCriterionFunction for RecursiveIndexSum {
        fn root_state(&mut self) -> Box<dyn CriterionState> {
            Box::new(SumState {
                value: self.full_value(),
                config: (0..self.dimension).collect(),
                removed: None,
            })
        }

        fn derive_state(
            &mut self,
            feature: usize,
            parent: &dyn CriterionState,
        ) -> Box<dyn CriterionState> {
            let config: Vec<usize> = parent
                .config()
                .iter()
                .copied()
                .filter(|&f| f != feature)
                .collect();
            Box::new(SumState {
                value: parent.value() - (feature + 1) as f64,
                config,
                removed: Some(feature),
            })
        }
    }

    struct PlainSum;

    impl CriterionFunction for PlainSum {
        fn initialize(&mut self, _dimension: usize, _data: &DataSet) {}

        fn full_value(&mut self) -> f64 {
            0.0
        }

        fn value(&mut self, _features: &[usize]) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_finds_optimum_via_state_derivation() {
        let data = DataSet::empty(9);
        let mut search = RecursiveBranchAndBound::new();
        search
            .run(&data, &mut RecursiveIndexSum { dimension: 0 }, 4)
            .unwrap();

        assert_eq!(search.feature_vector(), &[4, 5, 6, 7, 8]);
        assert_eq!(search.bound(), 35.0);
        let stats = search.stats();
        assert_eq!(
            stats.leaves_evaluated + stats.leaves_pruned,
            stats.leaves_total
        );
    }

    #[test]
    fn test_rejects_non_recursive_criterion() {
        let data = DataSet::empty(6);
        let mut search = RecursiveBranchAndBound::new();
        let err = search.run(&data, &mut PlainSum, 2).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidConfiguration(_)));
    }
}
