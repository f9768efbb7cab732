use mmv_core::Order;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("polyline has {points} points but {coefficients} coefficients")]
    CoefficientMismatch { points: usize, coefficients: usize },

    #[error("polyline coefficient {0} is negative or not finite")]
    InvalidCoefficient(f64),

    #[error("polyline has zero total length; cannot derive coefficients")]
    ZeroLengthPolyline,

    #[error("state {order} is invalid: {reason}")]
    InvalidState { order: Order, reason: String },

    #[error("state file is empty: {0}")]
    EmptyStateFile(String),

    #[error("line {line}: {source}")]
    Json {
        line:   usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
