use mmv_core::Timestamp;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("window start {start} is after its end {end}")]
    InvalidWindow { start: Timestamp, end: Timestamp },

    #[error("fragment {index} starts at {start} after its end {end}")]
    InvalidFragment { index: usize, start: Timestamp, end: Timestamp },

    #[error("fragment {index} starts at {start} before the previous fragment ends at {previous_end}")]
    Overlap { index: usize, start: Timestamp, previous_end: Timestamp },

    #[error("fragment {index} [{start}, {end}] lies outside the window")]
    OutsideWindow { index: usize, start: Timestamp, end: Timestamp },

    #[error("interval {index} ends at {end} but the next starts at {next_start}")]
    Discontinuity { index: usize, end: Timestamp, next_start: Timestamp },

    #[error("timeline covers [{start}, {end}] instead of the window [{window_start}, {window_end}]")]
    WindowMismatch {
        start:        Timestamp,
        end:          Timestamp,
        window_start: Timestamp,
        window_end:   Timestamp,
    },
}

pub type TimelineResult<T> = Result<T, TimelineError>;
