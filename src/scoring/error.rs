use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid scoring weights: {reason}")]
    InvalidWeights { reason: String },
}
