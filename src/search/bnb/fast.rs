//! Branch & bound with predicted criterion values.
use std::cmp::Ordering;

use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::bnb::{without_feature, BnbEngine, Contributions, SearchStats};
use crate::search::{check_run_arguments, SearchObserver, SelectionAlgorithm};

/// Heuristic extension of the improved branch & bound: a per-feature
/// running mean of the criterion decrease caused by removing that feature
/// is used to predict child values at inner levels, and a real evaluation
/// is only performed when the optimistic prediction could still beat the
/// bound. Leaves are always evaluated for real, so every accepted bound
/// comes from a true criterion value; nevertheless the substitution of
/// predictions at inner nodes makes the search near-optimal rather than
/// provably exact.
///
/// See P. Somol, P. Pudil, and J. Kittler,
/// "Fast Branch & Bound Algorithms for Optimal Feature Selection",
/// IEEE Transactions on Pattern Analysis and Machine Intelligence,
/// vol. 26 no. 7, pp. 900-912, 2004.
pub struct FastBranchAndBound {
    /// Number of samples of a feature's contribution required before its
    /// predictions are trusted.
    min_evaluations: u64,
    /// Safety margin (>= 1) applied to a predicted decrease when deciding
    /// whether a real evaluation is needed.
    optimism: f64,
    best_features: Vec<usize>,
    bound: f64,
    stats: SearchStats,
    observer: Option<Box<dyn SearchObserver>>,
}

impl Default for FastBranchAndBound {
    fn default() -> Self {
        Self::new()
    }
}

struct PredictedChild {
    feature: usize,
    value: f64,
    config: Vec<usize>,
    predicted: bool,
}

fn by_value_ascending(a: &PredictedChild, b: &PredictedChild) -> Ordering {
    a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal)
}

impl FastBranchAndBound {
    pub fn new() -> Self {
        FastBranchAndBound {
            min_evaluations: 1,
            optimism: 1.0,
            best_features: Vec::new(),
            bound: f64::NEG_INFINITY,
            stats: SearchStats::default(),
            observer: None,
        }
    }

    /// Create a search with explicit prediction parameters.
    pub fn with_parameters(min_evaluations: u64, optimism: f64) -> Self {
        FastBranchAndBound {
            min_evaluations,
            optimism,
            ..Self::new()
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

/// Prediction tunables, copied out of the algorithm for the run.
#[derive(Clone, Copy)]
struct Prediction {
    min_evaluations: u64,
    optimism: f64,
}

fn search(
    engine: &mut BnbEngine,
    criterion: &mut dyn CriterionFunction,
    contributions: &mut Contributions,
    prediction: Prediction,
    level: usize,
    parent_config: &[usize],
    parent_value: f64,
) -> Result<(), SelectionError> {
    let n_children = engine.children_count(level);

    if n_children == 1 {
        let leaf = engine.leaf_under(parent_config);
        let value = engine.evaluate(criterion, &leaf)?;
        engine.record_leaf(value, leaf);
        engine.count_leaf();
        return Ok(());
    }

    // Predictions may only stand in for evaluations at inner levels;
    // leaf-level children are always evaluated for real so the bound is
    // never raised by a guess.
    let may_predict = level + 1 < engine.removal_count();

    let pool: Vec<usize> = engine.pool.iter().copied().collect();
    let mut children = Vec::with_capacity(pool.len());
    for &feature in &pool {
        let config = without_feature(parent_config, feature);

        if may_predict && contributions.count[feature] > prediction.min_evaluations {
            children.push(PredictedChild {
                feature,
                value: parent_value - contributions.mean[feature],
                config,
                predicted: true,
            });
        } else {
            let value = engine.evaluate(criterion, &config)?;
            contributions.update(feature, parent_value - value);
            children.push(PredictedChild {
                feature,
                value,
                config,
                predicted: false,
            });
        }
    }
    children.sort_by(by_value_ascending);

    for child in children.iter().take(n_children) {
        engine.pool.remove(&child.feature);
    }

    for mut child in children.drain(..).take(n_children).rev() {
        let decision_value = if child.predicted {
            // Only spend a real evaluation if the pessimistic view of
            // the prediction could still beat the bound.
            let optimistic =
                parent_value - prediction.optimism * contributions.mean[child.feature];
            if optimistic <= engine.bound {
                optimistic
            } else {
                let value = engine.evaluate(criterion, &child.config)?;
                contributions.update(child.feature, parent_value - value);
                child.value = value;
                child.predicted = false;
                value
            }
        } else {
            child.value
        };

        if decision_value > engine.bound {
            // subtree cannot be cut off
            if level + 1 == engine.removal_count() {
                engine.record_leaf(child.value, child.config);
                engine.count_leaf();
            } else {
                let pool_before = engine.pool.clone();
                search(
                    engine,
                    criterion,
                    contributions,
                    prediction,
                    level + 1,
                    &child.config,
                    child.value,
                )?;
                debug_assert_eq!(pool_before, engine.pool, "pool not restored after child");
            }
        } else {
            engine.count_pruned_subtree(level)?;
        }

        engine.pool.insert(child.feature);
    }

    Ok(())
}

impl SelectionAlgorithm for FastBranchAndBound {
    fn run(
        &mut self,
        data: &DataSet,
        criterion: &mut dyn CriterionFunction,
        drop_count: usize,
    ) -> Result<(), SelectionError> {
        let dimension = data.dimension();
        check_run_arguments(dimension, drop_count)?;
        if self.optimism < 1.0 {
            return Err(SelectionError::InvalidConfiguration(format!(
                "optimism must be >= 1.0, got {}",
                self.optimism
            )));
        }

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
            let prediction = Prediction {
                min_evaluations: self.min_evaluations,
                optimism: self.optimism,
            };
            search(
                &mut engine,
                criterion,
                &mut contributions,
                prediction,
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
            "Fast B&B: bound {} after {} evaluations ({} leaves evaluated, {} pruned)",
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
