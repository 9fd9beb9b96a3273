//! Exhaustive subset enumeration.
use crate::criterion::CriterionFunction;
use crate::data::DataSet;
use crate::error::SelectionError;
use crate::math::binomial;
use crate::search::{check_run_arguments, checked_value, SearchObserver, SelectionAlgorithm};

/// Exhaustively search for the best subset of features.
///
/// Generates every strictly increasing index sequence of the target length,
/// so each subset is evaluated exactly once and the cost is exactly
/// C(n, k) criterion evaluations. This is the correctness oracle for the
/// other algorithms on small problems.
#[derive(Default)]
pub struct ExhaustiveSearch {
    best_features: Vec<usize>,
    bound: f64,
    evaluations: u64,
    observer: Option<Box<dyn SearchObserver>>,
}

impl ExhaustiveSearch {
    pub fn new() -> Self {
        ExhaustiveSearch {
            best_features: Vec::new(),
            bound: f64::NEG_INFINITY,
            evaluations: 0,
            observer: None,
        }
    }

    /// Attach an observer that receives a progress fraction after every
    /// evaluated subset.
    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.observer = Some(observer);
    }

    /// The criterion value of the best subset found.
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// The number of criterion evaluations performed by the last run.
    pub fn num_evaluations(&self) -> u64 {
        self.evaluations
    }

    fn search(
        &mut self,
        state: &mut EnumerationState,
        criterion: &mut dyn CriterionFunction,
        index: usize,
    ) -> Result<(), SelectionError> {
        if index == state.target_size {
            let value = checked_value(criterion, &state.candidate)?;
            self.evaluations += 1;

            if value > self.bound {
                self.bound = value;
                self.best_features = state.candidate.clone();
            }

            state.processed += 1;
            if let Some(observer) = self.observer.as_mut() {
                observer.progress(state.processed as f64 / state.total as f64);
            }

            return Ok(());
        }

        // Indices are strictly increasing along the candidate, so index i
        // can grow at most up to dimension - target_size + i.
        let low = state.candidate[index - 1] + 1;
        let high = state.dimension - state.target_size + index;
        for i in low..=high {
            state.candidate[index] = i;
            self.search(state, criterion, index + 1)?;
        }

        Ok(())
    }
}

struct EnumerationState {
    candidate: Vec<usize>,
    dimension: usize,
    target_size: usize,
    processed: u64,
    total: u64,
}

impl SelectionAlgorithm for ExhaustiveSearch {
    fn run(
        &mut self,
        data: &DataSet,
        criterion: &mut dyn CriterionFunction,
        drop_count: usize,
    ) -> Result<(), SelectionError> {
        let dimension = data.dimension();
        let target_size = check_run_arguments(dimension, drop_count)?;
        let total = binomial(dimension as u64, target_size as u64)?;

        criterion.initialize(dimension, data);

        self.bound = f64::NEG_INFINITY;
        self.best_features.clear();
        self.evaluations = 0;

        log::debug!(
            "Exhaustive search over {} subsets of size {} out of {} features",
            total,
            target_size,
            dimension
        );

        let mut state = EnumerationState {
            candidate: vec![0; target_size],
            dimension,
            target_size,
            processed: 0,
            total,
        };

        for i in 0..=dimension - target_size {
            state.candidate[0] = i;
            self.search(&mut state, criterion, 1)?;
        }

        debug_assert_eq!(state.processed, total);
        log::debug!("Exhaustive search done, best value {}", self.bound);

        Ok(())
    }

    fn feature_vector(&self) -> &[usize] {
        &self.best_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::CriterionFunction;

    /// Separable criterion: each feature i contributes i + 1.
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
    fn test_finds_top_indices() {
        let data = DataSet::empty(8);
        let mut search = ExhaustiveSearch::new();
        search.run(&data, &mut IndexSum, 5).unwrap();

        assert_eq!(search.feature_vector(), &[5, 6, 7]);
        assert_eq!(search.bound(), 21.0);
        // C(8, 3) evaluations, no shortcuts
        assert_eq!(search.num_evaluations(), 56);
    }

    #[test]
    fn test_target_size_one() {
        let data = DataSet::empty(5);
        let mut search = ExhaustiveSearch::new();
        search.run(&data, &mut IndexSum, 4).unwrap();
        assert_eq!(search.feature_vector(), &[4]);
    }

    #[test]
    fn test_drop_count_out_of_range() {
        let data = DataSet::empty(5);
        let mut search = ExhaustiveSearch::new();
        assert!(search.run(&data, &mut IndexSum, 5).is_err());
    }
}
