//! Greedy family on the three separable criteria with closed-form optima.
mod common;

use common::{IndexSumCriterion, MirrorSumCriterion, ResidueSumCriterion};
use subset_select::criterion::CriterionFunction;
use subset_select::data::DataSet;
use subset_select::search::greedy::{
    BackwardSelection, ForwardSelection, SequentialBackwardFloatingSearch,
    SequentialForwardFloatingSearch,
};
use subset_select::search::SelectionAlgorithm;

const N: usize = 46;
const M: usize = 29; // features to drop

/// Optimal value of `sum(f + 1)` when keeping the top N - M indices.
fn index_sum_optimum() -> f64 {
    ((N * (N + 1) - M * (M + 1)) / 2) as f64
}

/// Optimal value of `sum(N - f)` when keeping the bottom N - M indices.
fn mirror_sum_optimum() -> f64 {
    (N * (N - M) - (N - M - 1) * (N - M) / 2) as f64
}

/// Optimal value of `sum(f mod N/2)`; every residue occurs twice.
fn residue_sum_optimum() -> f64 {
    let h = N / 2;
    if (N - M) % 2 == 0 {
        (h * (h - 1) - M / 2 * (M / 2 - 1)) as f64
    } else {
        let k = (M + 1) / 2;
        (h * (h - 1) - k * (k - 1) + (k - 1)) as f64
    }
}

fn assert_reaches_optimum(algorithm: &mut dyn SelectionAlgorithm) {
    let data = DataSet::empty(N);

    let mut criterion = IndexSumCriterion::new();
    algorithm.run(&data, &mut criterion, M).unwrap();
    assert_eq!(algorithm.feature_vector().len(), N - M);
    assert_eq!(
        criterion.value(algorithm.feature_vector()),
        index_sum_optimum()
    );

    let mut criterion = MirrorSumCriterion::new();
    algorithm.run(&data, &mut criterion, M).unwrap();
    assert_eq!(
        criterion.value(algorithm.feature_vector()),
        mirror_sum_optimum()
    );

    let mut criterion = ResidueSumCriterion::new();
    algorithm.run(&data, &mut criterion, M).unwrap();
    assert_eq!(
        criterion.value(algorithm.feature_vector()),
        residue_sum_optimum()
    );
}

#[test]
fn test_forward_selection() {
    assert_reaches_optimum(&mut ForwardSelection::new());
}

#[test]
fn test_backward_selection() {
    assert_reaches_optimum(&mut BackwardSelection::new());
}

#[test]
fn test_sequential_forward_floating_search() {
    assert_reaches_optimum(&mut SequentialForwardFloatingSearch::new());
}

#[test]
fn test_sequential_backward_floating_search() {
    assert_reaches_optimum(&mut SequentialBackwardFloatingSearch::new());
}

#[test]
fn test_forward_and_backward_agree_on_subset() {
    let data = DataSet::empty(N);

    let mut forward = ForwardSelection::new();
    forward.run(&data, &mut IndexSumCriterion::new(), M).unwrap();

    let mut backward = BackwardSelection::new();
    backward.run(&data, &mut IndexSumCriterion::new(), M).unwrap();

    assert_eq!(forward.feature_vector(), backward.feature_vector());
    assert_eq!(forward.feature_vector(), (M..N).collect::<Vec<_>>());
}
