//! Subset search algorithms.
//!
//! Three families live here: the exhaustive baseline (`exhaustive`), the
//! exact branch & bound family (`bnb`) and the greedy nested-subset family
//! (`greedy`). All of them satisfy the [`SelectionAlgorithm`] contract and
//! report progress through the [`SearchObserver`] callback.
pub mod bnb;
pub mod exhaustive;
pub mod greedy;

use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;

/// A single mutation of a candidate subset: a feature moved between the
/// candidate and the feature pool.
///
/// `is_add` is pool-centric: `true` means the feature was returned to the
/// pool (dropped from the candidate), `false` means it was taken from the
/// pool (added to the candidate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub feature: usize,
    pub is_add: bool,
}

impl Operation {
    pub(crate) fn add(feature: usize) -> Self {
        Operation { feature, is_add: true }
    }

    pub(crate) fn remove(feature: usize) -> Self {
        Operation { feature, is_add: false }
    }
}

/// Callback interface for watching a running search.
///
/// Replaces a broadcast observer registry: an algorithm holds at most one
/// observer and invokes it synchronously. All methods have empty default
/// bodies so implementors only override what they care about.
pub trait SearchObserver {
    /// Fraction of the search space accounted for so far, in [0, 1].
    fn progress(&mut self, _fraction: f64) {}

    /// A candidate subset mutation (greedy family only).
    fn operation(&mut self, _op: Operation) {}
}

/// Common contract of all subset selection algorithms.
pub trait SelectionAlgorithm {
    /// Run the algorithm to completion for a given dataset, trying to get
    /// rid of `drop_count` features.
    ///
    /// The criterion is initialized with the data's dimension before any
    /// search work. Preconditions (`drop_count < dimension`, nonzero
    /// dimension) are checked up front and violations reported as
    /// `InvalidConfiguration` before the criterion is ever evaluated.
    ///
    /// # Arguments
    ///
    /// * `data` - The dataset to select features for.
    /// * `criterion` - The criterion function scoring candidate subsets.
    /// * `drop_count` - The number of features to get rid of.
    fn run(
        &mut self,
        data: &DataSet,
        criterion: &mut dyn CriterionFunction,
        drop_count: usize,
    ) -> Result<(), SelectionError>;

    /// The retained feature indices, ascending; length is
    /// `dimension - drop_count`. Empty before the first successful run.
    fn feature_vector(&self) -> &[usize];
}

/// Validate the common run preconditions and return the target subset size.
pub(crate) fn check_run_arguments(
    dimension: usize,
    drop_count: usize,
) -> Result<usize, SelectionError> {
    if dimension == 0 {
        return Err(SelectionError::InvalidConfiguration(
            "dataset has no features".to_string(),
        ));
    }
    if drop_count >= dimension {
        return Err(SelectionError::InvalidConfiguration(format!(
            "cannot drop {} of {} features; the target size must be at least 1",
            drop_count, dimension
        )));
    }
    Ok(dimension - drop_count)
}

/// Evaluate a subset and map NaN to a `NumericFailure`.
pub(crate) fn checked_value(
    criterion: &mut dyn CriterionFunction,
    features: &[usize],
) -> Result<f64, SelectionError> {
    let value = criterion.value(features);
    if value.is_nan() {
        Err(SelectionError::NumericFailure(features.to_vec()))
    } else {
        Ok(value)
    }
}
