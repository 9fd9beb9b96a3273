//! Oscillating search.
use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::search::greedy::{
    floating::{float_down_to_target, float_up_to_target},
    forward::select_to_target,
    DefaultFeatureSpace, DefaultSelectionComparator, FeatureSpace, GreedyState,
    NestedSubsetAlgorithm, SelectionComparator,
};
use crate::search::{
    check_run_arguments, checked_value, Operation, SearchObserver, SelectionAlgorithm,
};

const DEFAULT_DELTA_FACTOR: f64 = 0.5;

/// Refines an already target-sized candidate by swinging around the target
/// size. A down-swing drops `o` features and adds `o` back, an up-swing
/// adds `o` and drops `o` again, both with floating searches. The swing
/// depth `o` starts at 1 and grows each time both directions fail in a
/// row; the search terminates when `o` exceeds `delta`, a fraction of the
/// target size.
///
/// A numeric failure inside a swing's floating searches only fails that
/// swing; every other error aborts the run.
///
/// See P. Somol and P. Pudil,
/// "Oscillating Search Algorithms for Feature Selection",
/// International Conference on Pattern Recognition, pp. 406-409, 2000.
pub struct OscillatingSearch {
    delta_factor: f64,
    initial_candidate: Option<Vec<usize>>,
    feature_space: Option<Box<dyn FeatureSpace>>,
    comparator: Option<Box<dyn SelectionComparator>>,
    observer: Option<Box<dyn SearchObserver>>,
    features: Vec<usize>,
    value: f64,
}

enum Swing {
    Down,
    DownFailed,
    Up,
    UpFailed,
}

impl Default for OscillatingSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl OscillatingSearch {
    pub fn new() -> Self {
        OscillatingSearch {
            delta_factor: DEFAULT_DELTA_FACTOR,
            initial_candidate: None,
            feature_space: None,
            comparator: None,
            observer: None,
            features: Vec::new(),
            value: f64::NEG_INFINITY,
        }
    }

    /// Create a search with an explicit termination depth factor. `delta`
    /// is `target_size * delta_factor`, rounded down.
    pub fn with_delta_factor(delta_factor: f64) -> Self {
        OscillatingSearch {
            delta_factor,
            ..Self::new()
        }
    }

    /// Attach an observer that is told about every committed candidate
    /// mutation. Mutations inside an uncommitted swing are not reported.
    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.observer = Some(observer);
    }
}

impl NestedSubsetAlgorithm for OscillatingSearch {
    fn candidate(&self) -> &[usize] {
        &self.features
    }

    fn candidate_value(&self) -> f64 {
        self.value
    }

    /// For this search the initial candidate must already have the target
    /// size; it replaces the greedy forward seed.
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

/// Drop `o` features below the target and float back up. `Ok(None)` means
/// the swing failed.
#[allow(clippy::too_many_arguments)]
fn downswing(
    candidate: &[usize],
    space: &dyn FeatureSpace,
    comparator: &dyn SelectionComparator,
    criterion: &mut dyn CriterionFunction,
    target_size: usize,
    o: usize,
    records: &mut [f64],
    delta: usize,
) -> Result<Option<(Vec<usize>, f64)>, SelectionError> {
    // the reduced size must keep at least one feature
    if o >= target_size {
        return Ok(None);
    }

    let mut state = GreedyState {
        candidate: candidate.to_vec(),
        value: f64::NEG_INFINITY,
        space: space.clone_space(),
        comparator,
        observer: None,
    };

    match float_down_to_target(&mut state, criterion, target_size - o) {
        Ok(()) => {}
        Err(SelectionError::NumericFailure(_)) => return Ok(None),
        Err(e) => return Err(e),
    }
    if state.value < records[delta - o] {
        return Ok(None);
    }
    records[delta - o] = state.value;

    match float_up_to_target(&mut state, criterion, target_size) {
        Ok(()) => {}
        Err(SelectionError::NumericFailure(_)) => return Ok(None),
        Err(e) => return Err(e),
    }

    Ok(Some((state.candidate, state.value)))
}

/// Add `o` features above the target and float back down. `Ok(None)` means
/// the swing failed.
#[allow(clippy::too_many_arguments)]
fn upswing(
    candidate: &[usize],
    space: &dyn FeatureSpace,
    comparator: &dyn SelectionComparator,
    criterion: &mut dyn CriterionFunction,
    dimension: usize,
    target_size: usize,
    o: usize,
    records: &mut [f64],
    delta: usize,
) -> Result<Option<(Vec<usize>, f64)>, SelectionError> {
    // the enlarged size cannot exceed the dimension
    if target_size + o > dimension {
        return Ok(None);
    }

    let mut state = GreedyState {
        candidate: candidate.to_vec(),
        value: f64::NEG_INFINITY,
        space: space.clone_space(),
        comparator,
        observer: None,
    };

    match float_up_to_target(&mut state, criterion, target_size + o) {
        Ok(()) => {}
        Err(SelectionError::NumericFailure(_)) => return Ok(None),
        Err(e) => return Err(e),
    }
    if state.value < records[delta + o] {
        return Ok(None);
    }
    records[delta + o] = state.value;

    match float_down_to_target(&mut state, criterion, target_size) {
        Ok(()) => {}
        Err(SelectionError::NumericFailure(_)) => return Ok(None),
        Err(e) => return Err(e),
    }

    Ok(Some((state.candidate, state.value)))
}

/// Replace `candidate` with `new_candidate`, adjusting the master feature
/// space and reporting each mutation. Both slices must be sorted.
fn commit(
    candidate: &mut Vec<usize>,
    mut new_candidate: Vec<usize>,
    space: &mut dyn FeatureSpace,
    mut observer: Option<&mut dyn SearchObserver>,
) {
    new_candidate.sort_unstable();

    for &feature in candidate.iter() {
        if new_candidate.binary_search(&feature).is_err() {
            let op = Operation::add(feature);
            space.apply(&op);
            if let Some(observer) = observer.as_mut() {
                observer.operation(op);
            }
        }
    }
    for &feature in &new_candidate {
        if candidate.binary_search(&feature).is_err() {
            let op = Operation::remove(feature);
            space.apply(&op);
            if let Some(observer) = observer.as_mut() {
                observer.operation(op);
            }
        }
    }

    *candidate = new_candidate;
}

impl SelectionAlgorithm for OscillatingSearch {
    fn run(
        &mut self,
        data: &DataSet,
        criterion: &mut dyn CriterionFunction,
        drop_count: usize,
    ) -> Result<(), SelectionError> {
        let dimension = data.dimension();
        let target_size = check_run_arguments(dimension, drop_count)?;
        if !self.delta_factor.is_finite() || self.delta_factor < 0.0 {
            return Err(SelectionError::InvalidConfiguration(format!(
                "delta factor must be finite and non-negative, got {}",
                self.delta_factor
            )));
        }

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

        let delta = (target_size as f64 * self.delta_factor) as usize;
        let mut records = vec![f64::NEG_INFINITY; 2 * delta + 1];

        // Seed with a target-sized candidate and withhold it from the
        // master space; the space holds exactly the unselected features
        // from here on.
        let mut candidate = match &self.initial_candidate {
            Some(initial) => {
                if initial.len() != target_size {
                    return Err(SelectionError::InvalidConfiguration(format!(
                        "initial candidate has {} features but the target size is {}",
                        initial.len(),
                        target_size
                    )));
                }
                let mut candidate = initial.clone();
                candidate.sort_unstable();
                for &feature in &candidate {
                    space.apply(&Operation::remove(feature));
                }
                records[delta] = checked_value(criterion, &candidate)?;
                candidate
            }
            None => {
                let mut seed = GreedyState {
                    candidate: Vec::with_capacity(target_size),
                    value: f64::NEG_INFINITY,
                    space: space.clone_space(),
                    comparator,
                    observer: None,
                };
                select_to_target(&mut seed, criterion, target_size)?;
                records[delta] = seed.value;

                let mut candidate = seed.candidate;
                candidate.sort_unstable();
                for &feature in &candidate {
                    space.apply(&Operation::remove(feature));
                }
                candidate
            }
        };

        let mut c = 0;
        let mut o = 1;
        let mut swing = Swing::Down;

        while o <= delta {
            match swing {
                Swing::Down => {
                    let outcome = downswing(
                        &candidate,
                        space.as_ref(),
                        comparator,
                        criterion,
                        target_size,
                        o,
                        &mut records,
                        delta,
                    )?;
                    swing = match outcome {
                        Some((new_candidate, value)) if value > records[delta] => {
                            commit(
                                &mut candidate,
                                new_candidate,
                                space.as_mut(),
                                self.observer
                                    .as_mut()
                                    .map(|o| &mut **o as &mut dyn SearchObserver),
                            );
                            records[delta] = value;
                            c = 0;
                            o = 1;
                            Swing::Up
                        }
                        _ => Swing::DownFailed,
                    };
                }
                Swing::DownFailed => {
                    c += 1;
                    if c == 2 {
                        o += 1;
                        c = 0;
                    }
                    swing = Swing::Up;
                }
                Swing::Up => {
                    let outcome = upswing(
                        &candidate,
                        space.as_ref(),
                        comparator,
                        criterion,
                        dimension,
                        target_size,
                        o,
                        &mut records,
                        delta,
                    )?;
                    swing = match outcome {
                        Some((new_candidate, value)) if value > records[delta] => {
                            commit(
                                &mut candidate,
                                new_candidate,
                                space.as_mut(),
                                self.observer
                                    .as_mut()
                                    .map(|o| &mut **o as &mut dyn SearchObserver),
                            );
                            records[delta] = value;
                            c = 0;
                            o = 1;
                            Swing::Down
                        }
                        _ => Swing::UpFailed,
                    };
                }
                Swing::UpFailed => {
                    c += 1;
                    if c == 2 {
                        o += 1;
                        c = 0;
                    }
                    swing = Swing::Down;
                }
            }
        }

        self.features = candidate;
        self.value = records[delta];

        log::debug!(
            "oscillating search: {} features, criterion {}",
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
    fn test_keeps_optimal_seed_on_separable_criterion() {
        let data = DataSet::empty(10);
        let mut search = OscillatingSearch::new();
        search.run(&data, &mut IndexSum, 6).unwrap();

        assert_eq!(search.feature_vector(), &[6, 7, 8, 9]);
        assert_eq!(search.candidate_value(), 34.0);
    }

    #[test]
    fn test_improves_poor_initial_candidate() {
        let data = DataSet::empty(10);
        let mut search = OscillatingSearch::new();
        search.set_initial_candidate(vec![0, 1, 2, 3]);
        search.run(&data, &mut IndexSum, 6).unwrap();

        assert_eq!(search.feature_vector(), &[6, 7, 8, 9]);
        assert_eq!(search.candidate_value(), 34.0);
    }

    #[test]
    fn test_committed_operations_replay_to_final_candidate() {
        struct Recorder(std::rc::Rc<std::cell::RefCell<Vec<Operation>>>);

        impl SearchObserver for Recorder {
            fn operation(&mut self, op: Operation) {
                self.0.borrow_mut().push(op);
            }
        }

        let ops = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let data = DataSet::empty(10);
        let mut search = OscillatingSearch::new();
        search.set_initial_candidate(vec![0, 1, 2, 3]);
        search.set_observer(Box::new(Recorder(ops.clone())));
        search.run(&data, &mut IndexSum, 6).unwrap();

        // an add operation returns a feature to the pool, a remove takes
        // it out; replaying the committed stream over the seed must land
        // on the final candidate
        let mut replay: std::collections::BTreeSet<usize> = [0, 1, 2, 3].into_iter().collect();
        for op in ops.borrow().iter() {
            if op.is_add {
                replay.remove(&op.feature);
            } else {
                replay.insert(op.feature);
            }
        }
        assert_eq!(
            replay.into_iter().collect::<Vec<_>>(),
            search.feature_vector()
        );
    }

    #[test]
    fn test_rejects_wrongly_sized_initial_candidate() {
        let data = DataSet::empty(6);
        let mut search = OscillatingSearch::new();
        search.set_initial_candidate(vec![0, 1]);
        assert!(search.run(&data, &mut IndexSum, 2).is_err());
    }

    #[test]
    fn test_rejects_negative_delta_factor() {
        let data = DataSet::empty(6);
        let mut search = OscillatingSearch::with_delta_factor(-0.5);
        assert!(search.run(&data, &mut IndexSum, 2).is_err());
    }
}
