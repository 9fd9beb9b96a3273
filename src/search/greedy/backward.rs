//! Greedy backward selection.
use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::greedy::{
    worst_feature, DefaultFeatureSpace, DefaultSelectionComparator, FeatureSpace, GreedyState,
    NestedSubsetAlgorithm, SelectionComparator,
};
use crate::search::{
    check_run_arguments, checked_value, Operation, SearchObserver, SelectionAlgorithm,
};

/// Starts from the full feature set and repeatedly drops the feature whose
/// removal costs the criterion the least, until the target size is
/// reached.
///
/// See chapter 10.5, "Feature Subset Selection", in K. Fukunaga,
/// "Introduction to Statistical Pattern Recognition", 2nd edition,
/// Academic Press, 1990.
#[derive(Default)]
pub struct BackwardSelection {
    initial_candidate: Option<Vec<usize>>,
    feature_space: Option<Box<dyn FeatureSpace>>,
    comparator: Option<Box<dyn SelectionComparator>>,
    observer: Option<Box<dyn SearchObserver>>,
    features: Vec<usize>,
    value: f64,
}

impl BackwardSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer that is told about every candidate mutation.
    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.observer = Some(observer);
    }
}

impl NestedSubsetAlgorithm for BackwardSelection {
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

/// Shrink the candidate to `target_size` by greedy drops.
pub(crate) fn drop_to_target(
    state: &mut GreedyState,
    criterion: &mut dyn CriterionFunction,
    target_size: usize,
) -> Result<(), SelectionError> {
    while state.candidate.len() > target_size {
        let (feature, value) = worst_feature(criterion, &state.candidate, state.comparator)?;
        state.drop_feature(feature, value);
    }
    Ok(())
}

impl SelectionAlgorithm for BackwardSelection {
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
        drop_to_target(&mut state, criterion, target_size)?;
        if state.value == f64::NEG_INFINITY {
            // nothing was dropped
            state.value = checked_value(criterion, &state.candidate)?;
        }

        self.features = state.candidate;
        self.features.sort_unstable();
        self.value = state.value;

        log::debug!(
            "backward selection: {} features, criterion {}",
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
    fn test_drops_lowest_indices() {
        let data = DataSet::empty(8);
        let mut search = BackwardSelection::new();
        search.run(&data, &mut IndexSum, 5).unwrap();

        assert_eq!(search.feature_vector(), &[5, 6, 7]);
        assert_eq!(search.candidate_value(), 21.0);
    }

    #[test]
    fn test_keeps_full_set_when_nothing_dropped() {
        let data = DataSet::empty(4);
        let mut search = BackwardSelection::new();
        search.run(&data, &mut IndexSum, 0).unwrap();

        assert_eq!(search.feature_vector(), &[0, 1, 2, 3]);
        assert_eq!(search.candidate_value(), 10.0);
    }
}
