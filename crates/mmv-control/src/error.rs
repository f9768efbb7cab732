use mmv_core::{SimulationId, Timestamp};
use mmv_continuity::ContinuityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("simulation {0} has no start/end/max time bounds yet")]
    MissingTimeBounds(SimulationId),

    #[error("playback speed must be finite and non-zero, got {0}")]
    InvalidSpeed(f64),

    #[error("visualization time {0} is not finite")]
    InvalidTime(Timestamp),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Continuity(#[from] ContinuityError),
}

pub type ControlResult<T> = Result<T, ControlError>;
