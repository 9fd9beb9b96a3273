use crate::config::{AlgorithmKind, SearchConfig};
use crate::search::bnb::{
    BasicBranchAndBound, FastBranchAndBound, ImprovedBranchAndBound,
    PartialPredictionBranchAndBound, RecursiveBranchAndBound,
};
use crate::search::exhaustive::ExhaustiveSearch;
use crate::search::greedy::{
    BackwardSelection, ForwardSelection, OscillatingSearch, SequentialBackwardFloatingSearch,
    SequentialForwardFloatingSearch,
};
use crate::search::SelectionAlgorithm;

/// Build a boxed search algorithm from a `SearchConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_algorithm(config: &SearchConfig) -> Box<dyn SelectionAlgorithm> {
    match config.algorithm {
        AlgorithmKind::Exhaustive => Box::new(ExhaustiveSearch::new()),
        AlgorithmKind::BasicBnb => Box::new(BasicBranchAndBound::new()),
        AlgorithmKind::ImprovedBnb => Box::new(ImprovedBranchAndBound::new()),
        AlgorithmKind::FastBnb {
            min_evaluations,
            optimism,
        } => Box::new(FastBranchAndBound::with_parameters(min_evaluations, optimism)),
        AlgorithmKind::PartialPredictionBnb => Box::new(PartialPredictionBranchAndBound::new()),
        AlgorithmKind::RecursiveBnb => Box::new(RecursiveBranchAndBound::new()),
        AlgorithmKind::Forward => Box::new(ForwardSelection::new()),
        AlgorithmKind::Backward => Box::new(BackwardSelection::new()),
        AlgorithmKind::Sffs => Box::new(SequentialForwardFloatingSearch::new()),
        AlgorithmKind::Sbfs => Box::new(SequentialBackwardFloatingSearch::new()),
        AlgorithmKind::Oscillating { delta_factor } => {
            Box::new(OscillatingSearch::with_delta_factor(delta_factor))
        }
    }
}
