use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for subset searches in the crate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SearchConfig {
    /// The number of features to get rid of.
    pub drop_count: usize,

    #[serde(flatten)]
    pub algorithm: AlgorithmKind,
}

/// Supported search algorithms and their parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum AlgorithmKind {
    Exhaustive,
    BasicBnb,
    ImprovedBnb,
    FastBnb {
        min_evaluations: u64,
        optimism: f64,
    },
    PartialPredictionBnb,
    RecursiveBnb,
    Forward,
    Backward,
    Sffs,
    Sbfs,
    Oscillating {
        delta_factor: f64,
    },
}

impl Default for AlgorithmKind {
    fn default() -> Self {
        AlgorithmKind::Sffs
    }
}

impl FromStr for AlgorithmKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exhaustive" => Ok(AlgorithmKind::Exhaustive),
            "bnb" | "basic-bnb" => Ok(AlgorithmKind::BasicBnb),
            "improved-bnb" => Ok(AlgorithmKind::ImprovedBnb),
            "fast-bnb" => Ok(AlgorithmKind::FastBnb {
                min_evaluations: 1,
                optimism: 1.0,
            }),
            "partial-bnb" => Ok(AlgorithmKind::PartialPredictionBnb),
            "recursive-bnb" => Ok(AlgorithmKind::RecursiveBnb),
            "forward" => Ok(AlgorithmKind::Forward),
            "backward" => Ok(AlgorithmKind::Backward),
            "sffs" => Ok(AlgorithmKind::Sffs),
            "sbfs" => Ok(AlgorithmKind::Sbfs),
            "oscillating" => Ok(AlgorithmKind::Oscillating { delta_factor: 0.5 }),
            _ => Err(format!("Unknown search algorithm: {}", s)),
        }
    }
}

impl SearchConfig {
    pub fn new(drop_count: usize, algorithm: AlgorithmKind) -> Self {
        Self {
            drop_count,
            algorithm,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            drop_count: 0,
            algorithm: AlgorithmKind::default(),
        }
    }
}
