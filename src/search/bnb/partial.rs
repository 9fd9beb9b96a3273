//! Branch & bound with contribution-ordered children.
use std::cmp::Ordering;

use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::bnb::{without_feature, BnbEngine, Contributions, SearchStats};
use crate::search::{check_run_arguments, SearchObserver, SelectionAlgorithm};

/// Branch & bound that orders children by each feature's mean criterion
/// decrease instead of evaluating the whole pool up front. Only the
/// children actually branched into are evaluated, so every node costs
/// `children_count` evaluations instead of `pool.len()`. Since the bound
/// is only ever raised by real criterion values, the search stays exact
/// under a monotone criterion.
///
/// See P. Somol, P. Pudil, and J. Kittler,
/// "Fast Branch & Bound Algorithms for Optimal Feature Selection",
/// IEEE Transactions on Pattern Analysis and Machine Intelligence,
/// vol. 26 no. 7, pp. 900-912, 2004.
#[derive(Default)]
pub struct PartialPredictionBranchAndBound {
    best_features: Vec<usize>,
    bound: f64,
    stats: SearchStats,
    observer: Option<Box<dyn SearchObserver>>,
}

struct PredictedChild {
    feature: usize,
    contribution: f64,
}

fn by_contribution_descending(a: &PredictedChild, b: &PredictedChild) -> Ordering {
    b.contribution
        .partial_cmp(&a.contribution)
        .unwrap_or(Ordering::Equal)
}

impl PartialPredictionBranchAndBound {
    pub fn new() -> Self {
        PartialPredictionBranchAndBound {
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
    contributions: &mut Contributions,
    level: usize,
    candidate: &[usize],
    parent_value: f64,
) -> Result<(), SelectionError> {
    let n_children = engine.children_count(level);

    if n_children == 1 {
        let leaf = engine.leaf_under(candidate);
        let value = engine.evaluate(criterion, &leaf)?;
        engine.record_leaf(value, leaf);
        engine.count_leaf();
        return Ok(());
    }

    // Rank the pooled features by the decrease they have caused so far;
    // this costs no criterion evaluations.
    let mut children: Vec<PredictedChild> = engine
        .pool
        .iter()
        .map(|&feature| PredictedChild {
            feature,
            contribution: contributions.mean[feature],
        })
        .collect();
    children.sort_by(by_contribution_descending);

    // The highest-contributing features make the worst children and are
    // branched into first.
    for child in children.iter().take(n_children) {
        engine.pool.remove(&child.feature);
    }

    for child in children.drain(..).take(n_children).rev() {
        let config = without_feature(candidate, child.feature);
        let value = engine.evaluate(criterion, &config)?;
        contributions.update(child.feature, parent_value - value);

        if value > engine.bound {
            // subtree cannot be cut off
            if level + 1 == engine.removal_count() {
                engine.record_leaf(value, config);
                engine.count_leaf();
            } else {
                let pool_before = engine.pool.clone();
                search(engine, criterion, contributions, level + 1, &config, value)?;
                debug_assert_eq!(pool_before, engine.pool, "pool not restored after child");
            }
        } else {
            engine.count_pruned_subtree(level)?;
        }

        engine.pool.insert(child.feature);
    }

    Ok(())
}

impl SelectionAlgorithm for PartialPredictionBranchAndBound {
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
        let root_value = engine.evaluate_full(criterion)?;

        if drop_count == 0 {
            engine.record_leaf(root_value, candidate);
            engine.count_leaf();
        } else {
            let mut contributions = Contributions::new(dimension);
            search(
                &mut engine,
                criterion,
                &mut contributions,
                0,
                &candidate,
                root_value,
            )?;
        }
        engine.finish();

        self.bound = engine.bound;
        self.best_features = engine.best_features;
        self.stats = engine.stats;

        log::debug!(
            "Partial prediction B&B: bound {} after {} evaluations ({} leaves evaluated, {} pruned)",
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
    fn test_finds_optimum_on_separable_criterion() {
        let data = DataSet::empty(9);
        let mut search = PartialPredictionBranchAndBound::new();
        search.run(&data, &mut IndexSum, 4).unwrap();

        assert_eq!(search.feature_vector(), &[4, 5, 6, 7, 8]);
        assert_eq!(search.bound(), 35.0);
        let stats = search.stats();
        assert_eq!(
            stats.leaves_evaluated + stats.leaves_pruned,
            stats.leaves_total
        );
    }

    #[test]
    fn test_keeps_full_set_when_nothing_dropped() {
        let data = DataSet::empty(5);
        let mut search = PartialPredictionBranchAndBound::new();
        search.run(&data, &mut IndexSum, 0).unwrap();

        assert_eq!(search.feature_vector(), &[0, 1, 2, 3, 4]);
    }
}
