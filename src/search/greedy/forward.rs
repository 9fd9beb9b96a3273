//! Greedy forward selection.
use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::greedy::{
    best_feature, DefaultFeatureSpace, DefaultSelectionComparator, FeatureSpace, GreedyState,
    NestedSubsetAlgorithm, SelectionComparator,
};
use crate::search::{
    check_run_arguments, checked_value, Operation, SearchObserver, SelectionAlgorithm,
};

/// Starts from an empty candidate and repeatedly adds the feature that
/// raises the criterion the most, until the target size is reached.
///
/// See chapter 10.5, "Feature Subset Selection", in K. Fukunaga,
/// "Introduction to Statistical Pattern Recognition", 2nd edition,
/// Academic Press, 1990.
#[derive(Default)]
pub struct ForwardSelection {
    initial_candidate: Option<Vec<usize>>,
    feature_space: Option<Box<dyn FeatureSpace>>,
    comparator: Option<Box<dyn SelectionComparator>>,
    observer: Option<Box<dyn SearchObserver>>,
    features: Vec<usize>,
    value: f64,
}

impl ForwardSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer that is told about every candidate mutation.
    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.observer = Some(observer);
    }
}

impl NestedSubsetAlgorithm for ForwardSelection {
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

/// Grow the candidate to `target_size` by greedy adds.
pub(crate) fn select_to_target(
    state: &mut GreedyState,
    criterion: &mut dyn CriterionFunction,
    target_size: usize,
) -> Result<(), SelectionError> {
    while state.candidate.len() < target_size {
        let available = state.space.features();
        let (feature, value) =
            best_feature(criterion, &available, &state.candidate, state.comparator)?;
        state.add_feature(feature, value);
    }
    Ok(())
}

impl SelectionAlgorithm for ForwardSelection {
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
        select_to_target(&mut state, criterion, target_size)?;
        if state.value == f64::NEG_INFINITY {
            // initial candidate was already at target size
            state.value = checked_value(criterion, &state.candidate)?;
        }

        self.features = state.candidate;
        self.features.sort_unstable();
        self.value = state.value;

        log::debug!(
            "forward selection: {} features, criterion {}",
            self.features.len(),
            self.value
        );

        Ok(())
    }

    fn feature_vector(&self) -> &[usize] {
        &self.features
    }
}
