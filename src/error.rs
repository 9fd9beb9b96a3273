use std::error::Error;
use std::fmt;

/// Errors raised by the selection algorithms.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// A criterion evaluation produced NaN (e.g. a singular covariance
    /// matrix inside the caller's criterion). Carries the subset that was
    /// being evaluated.
    NumericFailure(Vec<usize>),
    /// The requested search is malformed (drop count out of range, missing
    /// recursive criterion support, empty feature space).
    InvalidConfiguration(String),
    /// A leaf count exceeded the range of u64.
    Overflow { n: u64, k: u64 },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SelectionError::NumericFailure(features) => {
                write!(f, "criterion value is NaN for subset {:?}", features)
            }
            SelectionError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            SelectionError::Overflow { n, k } => {
                write!(f, "binomial({}, {}) exceeds u64 range", n, k)
            }
        }
    }
}

impl Error for SelectionError {}
