//! Greedy nested-subset searches.
//!
//! The algorithms in this family grow or shrink one candidate subset by
//! single-feature operations: adding the feature that helps the criterion
//! the most, or dropping the one that hurts it the least. Every add takes
//! a feature out of the [`FeatureSpace`] and every drop returns it, so the
//! space always holds exactly the features still eligible for an add.
//! Results are suboptimal in general but cost only a polynomial number of
//! criterion evaluations.
pub mod backward;
pub mod floating;
pub mod forward;
pub mod oscillating;

pub use backward::BackwardSelection;
pub use floating::{SequentialBackwardFloatingSearch, SequentialForwardFloatingSearch};
pub use forward::ForwardSelection;
pub use oscillating::OscillatingSearch;

use std::cmp::Ordering;

use crate::criterion::CriterionFunction;
use crate::error::SelectionError;
use crate::search::{Operation, SearchObserver, SelectionAlgorithm};

/// Common surface of the greedy family beyond [`SelectionAlgorithm`]:
/// every member maintains one candidate subset and can be seeded,
/// restricted to a custom feature space, or given a different tie-breaking
/// policy before the run.
pub trait NestedSubsetAlgorithm: SelectionAlgorithm {
    /// The current candidate subset, ascending.
    fn candidate(&self) -> &[usize];

    /// The criterion value of the candidate.
    fn candidate_value(&self) -> f64;

    /// Start the search from a given candidate instead of the variant's
    /// default. The candidate's features are withheld from the feature
    /// space before the search.
    fn set_initial_candidate(&mut self, features: Vec<usize>);

    /// Restrict the search to a custom feature space.
    fn set_feature_space(&mut self, space: Box<dyn FeatureSpace>);

    /// Override the tie-breaking policy.
    fn set_selection_comparator(&mut self, comparator: Box<dyn SelectionComparator>);
}

/// The set of features currently eligible for an add operation.
///
/// A custom implementation can constrain the search, e.g. by refusing to
/// offer certain features once others have been picked. Spaces must be
/// deep-copyable through [`FeatureSpace::clone_space`]; the oscillating
/// search hands disposable copies to its inner searches.
pub trait FeatureSpace {
    /// Apply a candidate mutation: an add operation returns the feature to
    /// this space, a remove operation takes it out.
    fn apply(&mut self, op: &Operation);

    /// Snapshot of the eligible features.
    fn features(&self) -> Vec<usize>;

    /// Deep copy of this space.
    fn clone_space(&self) -> Box<dyn FeatureSpace>;
}

/// The default feature space: a plain list of feature indices, offered in
/// insertion order.
#[derive(Debug, Clone)]
pub struct DefaultFeatureSpace {
    features: Vec<usize>,
}

impl DefaultFeatureSpace {
    /// A space holding all features of a `dimension`-dimensional dataset.
    pub fn new(dimension: usize) -> Self {
        DefaultFeatureSpace {
            features: (0..dimension).collect(),
        }
    }

    /// A space holding exactly the given features.
    pub fn with_features(features: Vec<usize>) -> Self {
        DefaultFeatureSpace { features }
    }
}

impl FeatureSpace for DefaultFeatureSpace {
    fn apply(&mut self, op: &Operation) {
        if op.is_add {
            self.features.push(op.feature);
        } else {
            self.features.retain(|&f| f != op.feature);
        }
    }

    fn features(&self) -> Vec<usize> {
        self.features.clone()
    }

    fn clone_space(&self) -> Box<dyn FeatureSpace> {
        Box::new(self.clone())
    }
}

/// Tie-breaking policy for picking among scored features.
///
/// The default decides on the criterion value alone; a custom comparator
/// can prefer certain features when values are equal (e.g. cheaper ones).
pub trait SelectionComparator {
    /// Compare a challenger feature against the current incumbent.
    /// `Greater` means the challenger wins. The first scored feature
    /// becomes the incumbent without a comparison.
    fn compare(
        &self,
        feature: usize,
        value: f64,
        incumbent: usize,
        incumbent_value: f64,
    ) -> Ordering;
}

/// Picks purely by criterion value, ignoring the feature indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSelectionComparator;

impl SelectionComparator for DefaultSelectionComparator {
    fn compare(
        &self,
        _feature: usize,
        value: f64,
        _incumbent: usize,
        incumbent_value: f64,
    ) -> Ordering {
        value.partial_cmp(&incumbent_value).unwrap_or(Ordering::Equal)
    }
}

/// Working state of one greedy run: the candidate subset, its criterion
/// value, the feature space it draws from and the optional observer that
/// is told about every mutation.
pub(crate) struct GreedyState<'a> {
    pub candidate: Vec<usize>,
    pub value: f64,
    pub space: Box<dyn FeatureSpace>,
    pub comparator: &'a dyn SelectionComparator,
    pub observer: Option<&'a mut dyn SearchObserver>,
}

impl GreedyState<'_> {
    /// Move `feature` from the space into the candidate.
    pub fn add_feature(&mut self, feature: usize, value: f64) {
        self.candidate.push(feature);
        self.value = value;
        let op = Operation::remove(feature);
        self.space.apply(&op);
        if let Some(observer) = self.observer.as_mut() {
            observer.operation(op);
        }
    }

    /// Move `feature` from the candidate back into the space.
    pub fn drop_feature(&mut self, feature: usize, value: f64) {
        self.candidate.retain(|&f| f != feature);
        self.value = value;
        let op = Operation::add(feature);
        self.space.apply(&op);
        if let Some(observer) = self.observer.as_mut() {
            observer.operation(op);
        }
    }
}

/// Score every available feature joined onto `current` and return the one
/// the comparator likes best, with the criterion value of the enlarged
/// subset.
pub(crate) fn best_feature(
    criterion: &mut dyn CriterionFunction,
    available: &[usize],
    current: &[usize],
    comparator: &dyn SelectionComparator,
) -> Result<(usize, f64), SelectionError> {
    let mut subset = current.to_vec();
    subset.push(0);
    let last = subset.len() - 1;

    let mut best: Option<(usize, f64)> = None;
    for &feature in available {
        subset[last] = feature;
        let value = criterion.value(&subset);
        if value.is_nan() {
            return Err(SelectionError::NumericFailure(subset));
        }

        // the first scored feature seeds the incumbent unconditionally
        match best {
            None => best = Some((feature, value)),
            Some((incumbent, incumbent_value)) => {
                if comparator.compare(feature, value, incumbent, incumbent_value)
                    == Ordering::Greater
                {
                    best = Some((feature, value));
                }
            }
        }
    }

    best.ok_or_else(|| {
        SelectionError::InvalidConfiguration("no features available to add".to_string())
    })
}

/// Score every leave-one-out subset of `current` and return the feature
/// whose removal the comparator likes best, with the criterion value of
/// the reduced subset.
pub(crate) fn worst_feature(
    criterion: &mut dyn CriterionFunction,
    current: &[usize],
    comparator: &dyn SelectionComparator,
) -> Result<(usize, f64), SelectionError> {
    let mut worst: Option<(usize, f64)> = None;
    for (i, &feature) in current.iter().enumerate() {
        let mut subset = Vec::with_capacity(current.len() - 1);
        subset.extend_from_slice(&current[..i]);
        subset.extend_from_slice(&current[i + 1..]);

        let value = criterion.value(&subset);
        if value.is_nan() {
            return Err(SelectionError::NumericFailure(subset));
        }

        match worst {
            None => worst = Some((feature, value)),
            Some((incumbent, incumbent_value)) => {
                if comparator.compare(feature, value, incumbent, incumbent_value)
                    == Ordering::Greater
                {
                    worst = Some((feature, value));
                }
            }
        }
    }

    let (feature, value) = worst.ok_or_else(|| {
        SelectionError::InvalidConfiguration("cannot drop from an empty candidate".to_string())
    })?;
    log::trace!("dropping feature {} leaves criterion {}", feature, value);
    Ok((feature, value))
}
