//! subset-select: combinatorial feature subset selection.
//!
//! This crate implements the classic search algorithms for picking, out of
//! `n` candidate features, the subset of a caller-chosen target size that
//! maximizes a pluggable scalar criterion: an exhaustive baseline, a family
//! of exact branch & bound searches (with several pruning and heuristic
//! ordering strategies), and the greedy nested-subset family (forward and
//! backward selection, floating search, oscillating search).
//!
//! The criterion itself is supplied by the caller through the
//! [`criterion::CriterionFunction`] contract; branch & bound additionally
//! assumes the criterion is monotone non-increasing under feature removal.
//! The design favors small, testable modules: each algorithm is a plain
//! struct implementing [`search::SelectionAlgorithm`], and shared tree or
//! candidate bookkeeping lives in private engine types rather than in a
//! base-class hierarchy.
pub mod config;
pub mod criterion;
pub mod data;
pub mod error;
pub mod factory;
pub mod math;
pub mod search;
