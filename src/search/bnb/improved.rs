//! Branch & bound with criterion-ordered children.
use std::cmp::Ordering;

use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::bnb::{without_feature, BnbEngine, SearchStats};
use crate::search::{check_run_arguments, SearchObserver, SelectionAlgorithm};

/// Branch & bound that evaluates every pooled child up front and sorts them
/// by criterion value before branching, so the least promising removals are
/// explored first while the strongest features stay in the pool for the
/// deeper levels.
///
/// See P. Somol, P. Pudil, and J. Kittler,
/// "Fast Branch & Bound Algorithms for Optimal Feature Selection",
/// IEEE Transactions on Pattern Analysis and Machine Intelligence,
/// vol. 26 no. 7, pp. 900-912, 2004.
#[derive(Default)]
pub struct ImprovedBranchAndBound {
    best_features: Vec<usize>,
    bound: f64,
    stats: SearchStats,
    observer: Option<Box<dyn SearchObserver>>,
}

struct ScoredChild {
    feature: usize,
    value: f64,
    config: Vec<usize>,
}

fn by_value_ascending(a: &ScoredChild, b: &ScoredChild) -> Ordering {
    a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal)
}

impl ImprovedBranchAndBound {
    pub fn new() -> Self {
        ImprovedBranchAndBound {
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
        let leaf = engine.leaf_under(candidate);
        let value = engine.evaluate(criterion, &leaf)?;
        engine.record_leaf(value, leaf);
        engine.count_leaf();
        return Ok(());
    }

    // Leave one feature out at a time and score the result for every
    // feature still in the pool.
    let pool: Vec<usize> = engine.pool.iter().copied().collect();
    let mut scored = Vec::with_capacity(pool.len());
    for &feature in &pool {
        let config = without_feature(candidate, feature);
        let value = engine.evaluate(criterion, &config)?;
        scored.push(ScoredChild { feature, value, config });
    }
    scored.sort_by(by_value_ascending);

    // Only the lowest-valued children become branches; the rest stay in
    // the pool and are removed further down the tree.
    for child in scored.iter().take(n_children) {
        engine.pool.remove(&child.feature);
    }

    for child in scored.drain(..).take(n_children).rev() {
        if child.value > engine.bound {
            // subtree cannot be cut off
            if level + 1 == engine.removal_count() {
                engine.record_leaf(child.value, child.config);
                engine.count_leaf();
            } else {
                let pool_before = engine.pool.clone();
                search(engine, criterion, level + 1, &child.config)?;
                debug_assert_eq!(pool_before, engine.pool, "pool not restored after child");
            }
        } else {
            engine.count_pruned_subtree(level)?;
        }

        engine.pool.insert(child.feature);
    }

    Ok(())
}

impl SelectionAlgorithm for ImprovedBranchAndBound {
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
            "Improved B&B: bound {} after {} evaluations ({} leaves evaluated, {} pruned)",
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
