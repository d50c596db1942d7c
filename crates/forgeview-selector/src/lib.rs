//! Search-filtered, keyboard-navigable project list.
//!
//! [`scoring`] holds the pluggable match scorer and the pure
//! [`filter_and_sort`](scoring::filter_and_sort) step. [`selector`] wraps it in
//! a small state object whose [`RenderModel`](selector::RenderModel) a host UI
//! draws however it likes.

pub mod scoring;
pub mod selector;

pub use scoring::{FilterOptions, MatchScorer, ScoredCandidate, SubsequenceScorer, filter_and_sort};
pub use selector::{FilteredSelector, Placeholder, RenderEntry, RenderModel};
