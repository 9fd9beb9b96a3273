#![allow(dead_code)]

use subset_select::criterion::{CriterionFunction, CriterionState, RecursiveCriterionFunction};
use subset_select::data::DataSet;

/// Criterion `sum(f + 1)` over the selected features. Separable and
/// monotone; the optimum keeps the highest indices.
pub struct IndexSumCriterion {
    dimension: usize,
}

impl IndexSumCriterion {
    pub fn new() -> Self {
        IndexSumCriterion { dimension: 0 }
    }
}

impl CriterionFunction for IndexSumCriterion {
    fn initialize(&mut self, dimension: usize, _data: &DataSet) {
        self.dimension = dimension;
    }

    fn full_value(&mut self) -> f64 {
        (0..self.dimension).map(|f| (f + 1) as f64).sum()
    }

    fn value(&mut self, features: &[usize]) -> f64 {
        features.iter().map(|&f| (f + 1) as f64).sum()
    }
}

/// Criterion `sum(dimension - f)`; the optimum keeps the lowest indices.
pub struct MirrorSumCriterion {
    dimension: usize,
}

impl MirrorSumCriterion {
    pub fn new() -> Self {
        MirrorSumCriterion { dimension: 0 }
    }
}

impl CriterionFunction for MirrorSumCriterion {
    fn initialize(&mut self, dimension: usize, _data: &DataSet) {
        self.dimension = dimension;
    }

    fn full_value(&mut self) -> f64 {
        (0..self.dimension).map(|f| (self.dimension - f) as f64).sum()
    }

    fn value(&mut self, features: &[usize]) -> f64 {
        features.iter().map(|&f| (self.dimension - f) as f64).sum()
    }
}

/// Criterion `sum(f mod (dimension / 2))`; every residue occurs twice, so
/// optimal subsets are not unique.
pub struct ResidueSumCriterion {
    dimension: usize,
}

impl ResidueSumCriterion {
    pub fn new() -> Self {
        ResidueSumCriterion { dimension: 0 }
    }
}

impl CriterionFunction for ResidueSumCriterion {
    fn initialize(&mut self, dimension: usize, _data: &DataSet) {
        self.dimension = dimension;
    }

    fn full_value(&mut self) -> f64 {
        (0..self.dimension).map(|f| (f % (self.dimension / 2)) as f64).sum()
    }

    fn value(&mut self, features: &[usize]) -> f64 {
        let half = self.dimension / 2;
        features.iter().map(|&f| (f % half) as f64).sum()
    }
}

/// Weighted-sum criterion with caller-supplied positive weights. Monotone
/// as long as all weights are positive.
pub struct WeightedSumCriterion {
    weights: Vec<f64>,
}

impl WeightedSumCriterion {
    pub fn new(weights: Vec<f64>) -> Self {
        WeightedSumCriterion { weights }
    }
}

impl CriterionFunction for WeightedSumCriterion {
    fn initialize(&mut self, dimension: usize, _data: &DataSet) {
        assert_eq!(dimension, self.weights.len());
    }

    fn full_value(&mut self) -> f64 {
        self.weights.iter().sum()
    }

    fn value(&mut self, features: &[usize]) -> f64 {
        features.iter().map(|&f| self.weights[f]).sum()
    }
}

/// The same weighted sum, exposed through derivable states for the
/// recursive branch & bound.
pub struct RecursiveWeightedSum {
    weights: Vec<f64>,
}

impl RecursiveWeightedSum {
    pub fn new(weights: Vec<f64>) -> Self {
        RecursiveWeightedSum { weights }
    }
}

struct WeightedSumState {
    value: f64,
    config: Vec<usize>,
    removed: Option<usize>,
}

impl CriterionState for WeightedSumState {
    fn value(&self) -> f64 {
        self.value
    }

    fn config(&self) -> &[usize] {
        &self.config
    }

    fn removed_feature(&self) -> Option<usize> {
        self.removed
    }
}

impl CriterionFunction for RecursiveWeightedSum {
    fn initialize(&mut self, dimension: usize, _data: &DataSet) {
        assert_eq!(dimension, self.weights.len());
    }

    fn full_value(&mut self) -> f64 {
        self.weights.iter().sum()
    }

    fn value(&mut self, features: &[usize]) -> f64 {
        features.iter().map(|&f| self.weights[f]).sum()
    }

    fn as_recursive(&mut self) -> Option<&mut dyn RecursiveCriterionFunction> {
        Some(self)
    }
}

impl RecursiveCriterionFunction for RecursiveWeightedSum {
    fn root_state(&mut self) -> Box<dyn CriterionState> {
        Box::new(WeightedSumState {
            value: self.weights.iter().sum(),
            config: (0..self.weights.len()).collect(),
            removed: None,
        })
    }

    fn derive_state(
        &mut self,
        feature: usize,
        parent: &dyn CriterionState,
    ) -> Box<dyn CriterionState> {
        let config: Vec<usize> = parent
            .config()
            .iter()
            .copied()
            .filter(|&f| f != feature)
            .collect();
        Box::new(WeightedSumState {
            value: parent.value() - self.weights[feature],
            config,
            removed: Some(feature),
        })
    }
}
