//! Statistical significance of diagonal word-hit counts.

pub mod poisson;

pub use poisson::{poisson_tail, score_significance, ScoreThresholds, Significance};
