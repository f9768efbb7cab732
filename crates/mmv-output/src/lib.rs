//! `mmv-output` — diagnostic frame export for the multimodal visualizer.
//!
//! | Backend | Files created                                   |
//! |---------|-------------------------------------------------|
//! | CSV     | `entity_frames.csv`, `frame_summaries.csv`      |
//!
//! Backends implement [`FrameWriter`] and are driven by
//! [`FrameOutputObserver`], which implements `mmv_control::FrameObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mmv_output::{FrameCsvWriter, FrameOutputObserver};
//!
//! let writer = FrameCsvWriter::new(Path::new("./frames"))?;
//! let mut obs = FrameOutputObserver::new(writer);
//! visualizer.frame_observed(now, &mut source, &mut obs);
//! visualizer.end(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use self::csv::FrameCsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::FrameOutputObserver;
pub use row::{EntityKind, EntityRow, FrameSummaryRow, entity_rows};
pub use writer::FrameWriter;
