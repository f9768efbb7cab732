//! The `FrameWriter` trait implemented by export backends.

use crate::{EntityRow, FrameSummaryRow, OutputResult};

/// Sink for exported frames.
///
/// Errors are stored by [`FrameOutputObserver`][crate::FrameOutputObserver]
/// and retrieved with its `take_error`.
pub trait FrameWriter {
    /// Write every entity row of one frame.
    fn write_entities(&mut self, rows: &[EntityRow]) -> OutputResult<()>;

    /// Write one frame summary row.
    fn write_summary(&mut self, row: &FrameSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
