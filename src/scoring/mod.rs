//! Composite scoring and verdict classification.
//!
//! A finding's suspicion is a fixed weighted sum of four signals: the cross-encoder
//! score of the best retrieved source plus the three lexical metrics from
//! [`crate::lexical`]. The composite is mapped to a [`Verdict`] by threshold bands.
//!
//! # Weight Normalization
//!
//! The default weights (0.65 + 0.15 + 0.15 + 0.15) sum to 1.10, so composites can
//! exceed 1.0 for near-verbatim copies. This matches the scores the verdict thresholds
//! were calibrated against. [`ScoringWeights`] is configurable; do not renormalize the
//! defaults without recalibrating the bands in [`crate::constants`].

pub mod error;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ScoringError;
pub use scorer::{CompositeScorer, best_hit_index};
pub use types::{CompositeScore, ScoringWeights, Verdict, classify};
