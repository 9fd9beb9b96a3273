//! Sequential floating searches.
//!
//! Floating searches interleave the two greedy directions: after every
//! step toward the target size, corrective steps in the opposite direction
//! are taken as long as they beat the best value previously recorded for
//! the size they return to. This lets the search revise earlier choices at
//! polynomial cost.
//!
//! See P. Pudil, J. Novovicova and J. Kittler,
//! "Floating Search Methods in Feature Selection",
//! Pattern Recognition Letters, vol. 15, pp. 1119-1125, 1994.
use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::greedy::{
    best_feature, worst_feature, DefaultFeatureSpace, DefaultSelectionComparator, FeatureSpace,
    GreedyState, NestedSubsetAlgorithm, SelectionComparator,
};
use crate::search::{
    check_run_arguments, checked_value, Operation, SearchObserver, SelectionAlgorithm,
};

/// Grow the candidate to `target_size`, dropping features again whenever a
/// removal beats the best value recorded for the smaller size.
///
/// `records[target_size - size]` is a high-water mark: the best value any
/// subset of `size` features has reached during this run.
pub(crate) fn float_up_to_target(
    state: &mut GreedyState,
    criterion: &mut dyn CriterionFunction,
    target_size: usize,
) -> Result<(), SelectionError> {
    let start = state.candidate.len();
    let mut records = vec![f64::NEG_INFINITY; target_size.saturating_sub(start)];
    let mut size = start;

    // The first two features are picked unconditionally; a candidate of
    // fewer than two features has nothing worth dropping.
    for _ in 0..2 {
        if size >= target_size {
            break;
        }
        let available = state.space.features();
        let (feature, value) =
            best_feature(criterion, &available, &state.candidate, state.comparator)?;
        state.add_feature(feature, value);
        size += 1;
        records[target_size - size] = records[target_size - size].max(value);
    }

    while size < target_size {
        let available = state.space.features();
        let (feature, value) =
            best_feature(criterion, &available, &state.candidate, state.comparator)?;
        state.add_feature(feature, value);
        size += 1;
        records[target_size - size] = records[target_size - size].max(value);

        // Drop features again while that improves on the best subset seen
        // at the smaller size.
        let (mut worst_f, mut worst_v) =
            worst_feature(criterion, &state.candidate, state.comparator)?;
        while size > start + 1 && worst_v > records[target_size - size + 1] {
            state.drop_feature(worst_f, worst_v);
            size -= 1;
            records[target_size - size] = records[target_size - size].max(worst_v);

            let next = worst_feature(criterion, &state.candidate, state.comparator)?;
            worst_f = next.0;
            worst_v = next.1;
        }
    }

    Ok(())
}

/// Shrink the candidate to `target_size`, re-adding features whenever an
/// add beats the best value recorded for the larger size.
///
/// `records[size - target_size]` is a high-water mark: the best value any
/// subset of `size` features has reached during this run.
pub(crate) fn float_down_to_target(
    state: &mut GreedyState,
    criterion: &mut dyn CriterionFunction,
    target_size: usize,
) -> Result<(), SelectionError> {
    let start = state.candidate.len();
    let mut records = vec![f64::NEG_INFINITY; start.saturating_sub(target_size)];
    let mut size = start;

    // The first two drops are unconditional; there is no larger recorded
    // subset to float back to yet.
    for _ in 0..2 {
        if size <= target_size {
            break;
        }
        let (feature, value) = worst_feature(criterion, &state.candidate, state.comparator)?;
        state.drop_feature(feature, value);
        size -= 1;
        records[size - target_size] = records[size - target_size].max(value);
    }

    while size > target_size {
        let (feature, value) = worst_feature(criterion, &state.candidate, state.comparator)?;
        state.drop_feature(feature, value);
        size -= 1;
        records[size - target_size] = records[size - target_size].max(value);

        // Re-add features while that improves on the best subset seen at
        // the larger size.
        let available = state.space.features();
        let (mut best_f, mut best_v) =
            best_feature(criterion, &available, &state.candidate, state.comparator)?;
        while size < start - 1 && best_v > records[size - target_size + 1] {
            state.add_feature(best_f, best_v);
            size += 1;
            records[size - target_size] = records[size - target_size].max(best_v);

            let available = state.space.features();
            let next = best_feature(criterion, &available, &state.candidate, state.comparator)?;
            best_f = next.0;
            best_v = next.1;
        }
    }

    Ok(())
}

/// Sequential forward floating search: grows an empty candidate to the
/// target size with corrective drops along the way.
#[derive(Default)]
pub struct SequentialForwardFloatingSearch {
    initial_candidate: Option<Vec<usize>>,
    feature_space: Option<Box<dyn FeatureSpace>>,
    comparator: Option<Box<dyn SelectionComparator>>,
    observer: Option<Box<dyn SearchObserver>>,
    features: Vec<usize>,
    value: f64,
}

impl SequentialForwardFloatingSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer that is told about every candidate mutation.
    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.observer = Some(observer);
    }
}

impl NestedSubsetAlgorithm for SequentialForwardFloatingSearch {
    fn candidate(&self) -> &[usize] {
        &self.features
    }

    fn candidate_value(&self) -> f64 {
        self.value
    }

    fn set_initial_candidate(&mut self, features: Vec<usize>) {
        self.initial_candidate = Some(features);
    }

    fn set_feature_space(&mut self, space: Box<dyn FeatureSpace>) {
        self.feature_space = Some(space);
    }

    fn set_selection_comparator(&mut self, comparator: Box<dyn SelectionComparator>) {
        self.comparator = Some(comparator);
    }
}

impl SelectionAlgorithm for SequentialForwardFloatingSearch {
    fn run(
        &mut self,
        data: &DataSet,
        criterion: &mut dyn CriterionFunction,
        drop_count: usize,
    ) -> Result<(), SelectionError> {
        let dimension = data.dimension();
        let target_size = check_run_arguments(dimension, drop_count)?;

        criterion.initialize(dimension, data);

        let comparator = DefaultSelectionComparator;
        let comparator: &dyn SelectionComparator = match &self.comparator {
            Some(c) => c.as_ref(),
            None => &comparator,
        };
        let mut space: Box<dyn FeatureSpace> = match &self.feature_space {
            Some(s) => s.clone_space(),
            None => Box::new(DefaultFeatureSpace::new(dimension)),
        };

        let candidate = match &self.initial_candidate {
            Some(initial) if initial.len() > target_size => {
                return Err(SelectionError::InvalidConfiguration(format!(
                    "initial candidate has {} features but the target size is {}",
                    initial.len(),
                    target_size
                )));
            }
            Some(initial) => {
                for &feature in initial {
                    space.apply(&Operation::remove(feature));
                }
                initial.clone()
            }
            None => Vec::with_capacity(target_size),
        };

        let mut state = GreedyState {
            candidate,
            value: f64::NEG_INFINITY,
            space,
            comparator,
            observer: self.observer.as_mut().map(|o| &mut **o as &mut dyn SearchObserver),
        };
        float_up_to_target(&mut state, criterion, target_size)?;
        if state.value == f64::NEG_INFINITY {
            // initial candidate was already at target size
            state.value = checked_value(criterion, &state.candidate)?;
        }

        self.features = state.candidate;
        self.features.sort_unstable();
        self.value = state.value;

        log::debug!(
            "forward floating search: {} features, criterion {}",
            self.features.len(),
            self.value
        );

        Ok(())
    }

    fn feature_vector(&self) -> &[usize] {
        &self.features
    }
}

/// Sequential backward floating search: shrinks the full feature set to
/// the target size with corrective adds along the way.
#[derive(Default)]
pub struct SequentialBackwardFloatingSearch {
    initial_candidate: Option<Vec<usize>>,
    feature_space: Option<Box<dyn FeatureSpace>>,
    comparator: Option<Box<dyn SelectionComparator>>,
    observer: Option<Box<dyn SearchObserver>>,
    features: Vec<usize>,
    value: f64,
}

impl SequentialBackwardFloatingSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer that is told about every candidate mutation.
    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.observer = Some(observer);
    }
}

impl NestedSubsetAlgorithm for SequentialBackwardFloatingSearch {
    fn candidate(&self) -> &[usize] {
        &self.features
    }

    fn candidate_value(&self) -> f64 {
        self.value
    }

    fn set_initial_candidate(&mut self, features: Vec<usize>) {
        self.initial_candidate = Some(features);
    }

    fn set_feature_space(&mut self, space: Box<dyn FeatureSpace>) {
        self.feature_space = Some(space);
    }

    fn set_selection_comparator(&mut self, comparator: Box<dyn SelectionComparator>) {
        self.comparator = Some(comparator);
    }
}

impl SelectionAlgorithm for SequentialBackwardFloatingSearch {
    fn run(
        &mut self,
        data: &DataSet,
        criterion: &mut dyn CriterionFunction,
        drop_count: usize,
    ) -> Result<(), SelectionError> {
        let dimension = data.dimension();
        let target_size = check_run_arguments(dimension, drop_count)?;

        criterion.initialize(dimension, data);

        let comparator = DefaultSelectionComparator;
        let comparator: &dyn SelectionComparator = match &self.comparator {
            Some(c) => c.as_ref(),
            None => &comparator,
        };
        let mut space: Box<dyn FeatureSpace> = match &self.feature_space {
            Some(s) => s.clone_space(),
            None => Box::new(DefaultFeatureSpace::new(dimension)),
        };

        let candidate = match &self.initial_candidate {
            Some(initial) if initial.len() < target_size => {
                return Err(SelectionError::InvalidConfiguration(format!(
                    "initial candidate has {} features but the target size is {}",
                    initial.len(),
                    target_size
                )));
            }
            Some(initial) => initial.clone(),
            None => space.features(),
        };
        for &feature in &candidate {
            space.apply(&Operation::remove(feature));
        }

        let mut state = GreedyState {
            candidate,
            value: f64::NEG_INFINITY,
            space,
            comparator,
            observer: self.observer.as_mut().map(|o| &mut **o as &mut dyn SearchObserver),
        };
        float_down_to_target(&mut state, criterion, target_size)?;
        if state.value == f64::NEG_INFINITY {
            // nothing was dropped
            state.value = checked_value(criterion, &state.candidate)?;
        }

        self.features = state.candidate;
        self.features.sort_unstable();
        self.value = state.value;

        log::debug!(
            "backward floating search: {} features, criterion {}",
            self.features.len(),
            self.value
        );

        Ok(())
    }

    fn feature_vector(&self) -> &[usize] {
        &self.features
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
    fn test_forward_floating_on_separable_criterion() {
        let data = DataSet::empty(8);
        let mut search = SequentialForwardFloatingSearch::new();
        search.run(&data, &mut IndexSum, 5).unwrap();

        assert_eq!(search.feature_vector(), &[5, 6, 7]);
        assert_eq!(search.candidate_value(), 21.0);
    }

    #[test]
    fn test_backward_floating_on_separable_criterion() {
        let data = DataSet::empty(8);
        let mut search = SequentialBackwardFloatingSearch::new();
        search.run(&data, &mut IndexSum, 5).unwrap();

        assert_eq!(search.feature_vector(), &[5, 6, 7]);
        assert_eq!(search.candidate_value(), 21.0);
    }
}
