use mmv_core::Order;
use mmv_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContinuityError {
    #[error("state {order} rejected: {source}")]
    RejectedState {
        order:  Order,
        #[source]
        source: ModelError,
    },

    #[error("fetch margin must be finite and non-negative, got {0}")]
    InvalidMargin(f64),
}

pub type ContinuityResult<T> = Result<T, ContinuityError>;
