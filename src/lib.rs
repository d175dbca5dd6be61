//! Survivor: Titanic survival workflow library
//!
//! Exploration, a deterministic preprocessing pipeline with train/test
//! schema reconciliation, and a small set of classifiers to evaluate on it.

pub mod cli;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod utils;
