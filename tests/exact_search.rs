//! The exact searches must agree with the exhaustive baseline.
mod common;

use common::{RecursiveWeightedSum, WeightedSumCriterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use subset_select::data::DataSet;
use subset_select::search::bnb::{
    BasicBranchAndBound, FastBranchAndBound, ImprovedBranchAndBound,
    PartialPredictionBranchAndBound, RecursiveBranchAndBound,
};
use subset_select::search::exhaustive::ExhaustiveSearch;
use subset_select::search::SelectionAlgorithm;

const DIMENSION: usize = 12;
const DROP: usize = 7;

/// Distinct positive weights, so the criterion is monotone and the optimal
/// subset is unique.
fn weights() -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..DIMENSION).map(|_| rng.gen_range(0.5..1.5)).collect()
}

#[test]
fn test_branch_and_bound_matches_exhaustive() {
    let data = DataSet::empty(DIMENSION);
    let weights = weights();

    let mut exhaustive = ExhaustiveSearch::new();
    exhaustive
        .run(&data, &mut WeightedSumCriterion::new(weights.clone()), DROP)
        .unwrap();
    let optimum = exhaustive.bound();
    let optimal_subset = exhaustive.feature_vector().to_vec();

    let mut basic = BasicBranchAndBound::new();
    basic
        .run(&data, &mut WeightedSumCriterion::new(weights.clone()), DROP)
        .unwrap();
    assert_eq!(basic.feature_vector(), optimal_subset.as_slice());
    assert_eq!(basic.bound(), optimum);

    let mut improved = ImprovedBranchAndBound::new();
    improved
        .run(&data, &mut WeightedSumCriterion::new(weights.clone()), DROP)
        .unwrap();
    assert_eq!(improved.feature_vector(), optimal_subset.as_slice());
    assert_eq!(improved.bound(), optimum);

    let mut partial = PartialPredictionBranchAndBound::new();
    partial
        .run(&data, &mut WeightedSumCriterion::new(weights.clone()), DROP)
        .unwrap();
    assert_eq!(partial.feature_vector(), optimal_subset.as_slice());
    assert_eq!(partial.bound(), optimum);

    let mut recursive = RecursiveBranchAndBound::new();
    recursive
        .run(&data, &mut RecursiveWeightedSum::new(weights.clone()), DROP)
        .unwrap();
    assert_eq!(recursive.feature_vector(), optimal_subset.as_slice());
    // the recursive bound is built by repeated subtraction from the full
    // value, so it can differ from the direct sum by a few ULP
    assert!((recursive.bound() - optimum).abs() < 1e-9);
}

#[test]
fn test_fast_branch_and_bound_stays_below_optimum() {
    let data = DataSet::empty(DIMENSION);
    let weights = weights();

    let mut exhaustive = ExhaustiveSearch::new();
    exhaustive
        .run(&data, &mut WeightedSumCriterion::new(weights.clone()), DROP)
        .unwrap();

    // predictions make the fast variant near-optimal, never super-optimal
    let mut fast = FastBranchAndBound::new();
    fast.run(&data, &mut WeightedSumCriterion::new(weights), DROP)
        .unwrap();
    assert_eq!(fast.feature_vector().len(), DIMENSION - DROP);
    assert!(fast.bound() <= exhaustive.bound());
    assert!(fast.bound().is_finite());
}

#[test]
fn test_improved_needs_fewer_leaf_visits_than_exhaustive() {
    let data = DataSet::empty(DIMENSION);
    let weights = weights();

    let mut exhaustive = ExhaustiveSearch::new();
    exhaustive
        .run(&data, &mut WeightedSumCriterion::new(weights.clone()), DROP)
        .unwrap();

    let mut improved = ImprovedBranchAndBound::new();
    improved
        .run(&data, &mut WeightedSumCriterion::new(weights), DROP)
        .unwrap();

    let stats = improved.stats();
    assert!(stats.leaves_evaluated < exhaustive.num_evaluations());
    assert_eq!(stats.leaves_evaluated + stats.leaves_pruned, stats.leaves_total);
}
