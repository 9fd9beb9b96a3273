//! Contracts between the search algorithms and the caller's criterion.
use crate::data::DataSet;

/// A scalar fitness function over feature subsets.
///
/// Higher values indicate better subsets. The branch & bound algorithms
/// additionally assume the criterion is monotone non-increasing under
/// feature removal (for any S' ⊂ S, value(S') <= value(S)); this is a
/// contract with the caller, not something the library checks at runtime.
///
/// A NaN returned from `value` signals a numeric failure inside the
/// criterion (e.g. a singular covariance matrix) and aborts the running
/// search, except inside the oscillating search's inner floating searches
/// where it only fails the current swing.
pub trait CriterionFunction {
    /// Initialize with a dataset. Discards any previously stored state.
    ///
    /// # Arguments
    ///
    /// * `dimension` - The number of features in the input vectors.
    /// * `data` - The sample data to estimate the criterion from.
    fn initialize(&mut self, dimension: usize, data: &DataSet);

    /// The criterion value for the full feature set.
    fn full_value(&mut self) -> f64;

    /// The criterion value for a subset of features.
    ///
    /// # Arguments
    ///
    /// * `features` - The indices of the features in this subset.
    fn value(&mut self, features: &[usize]) -> f64;

    /// Access the recursive-state extension of this criterion, if it has
    /// one. The recursive branch & bound algorithm requires this and fails
    /// fast when `None` is returned.
    fn as_recursive(&mut self) -> Option<&mut dyn RecursiveCriterionFunction> {
        None
    }
}

/// A criterion that can derive the value of a child subset incrementally
/// from an algebraic snapshot of its parent (e.g. a rank-one downdate of an
/// inverse matrix), instead of recomputing from scratch.
pub trait RecursiveCriterionFunction: CriterionFunction {
    /// The state for the full feature set used at initialization.
    fn root_state(&mut self) -> Box<dyn CriterionState>;

    /// Derive the state reached by dropping `feature` from `parent`.
    ///
    /// # Arguments
    ///
    /// * `feature` - The index of the feature to drop from the parent state.
    /// * `parent` - The state this one is derived from.
    fn derive_state(
        &mut self,
        feature: usize,
        parent: &dyn CriterionState,
    ) -> Box<dyn CriterionState>;
}

/// An immutable algebraic snapshot attached to one node of the branch &
/// bound search tree. States are created lazily along the explored path and
/// dropped on backtrack; they never outlive the recursion frame that
/// created them.
pub trait CriterionState {
    /// The criterion value of this state.
    fn value(&self) -> f64;

    /// The feature indices present in this state, ascending.
    fn config(&self) -> &[usize];

    /// The feature that was removed from the parent to create this state,
    /// or `None` for the root.
    fn removed_feature(&self) -> Option<usize>;
}
