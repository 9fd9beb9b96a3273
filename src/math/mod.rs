//! Small numeric helpers used throughout the crate.
pub mod binomial;

pub use binomial::binomial;
