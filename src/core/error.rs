use thiserror::Error;

/// Errors raised while scoring a broker catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid broker record {id}: {reason}")]
    InvalidBroker { id: String, reason: String },

    #[error("Score for broker {id} is not a finite number")]
    NonFiniteScore { id: String },
}
