//! `FrameOutputObserver<W>` — bridges `FrameObserver` to a `FrameWriter`.

use std::time::Duration;

use mmv_animation::Frame;
use mmv_control::FrameObserver;
use mmv_core::Timestamp;

use crate::row::{FrameSummaryRow, entity_rows};
use crate::writer::FrameWriter;
use crate::{OutputError, OutputResult};

/// A [`FrameObserver`] that exports frames to any [`FrameWriter`].
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  Check them with [`take_error`][Self::take_error]
/// once the visualization has ended.
pub struct FrameOutputObserver<W: FrameWriter> {
    writer:     W,
    /// Export every n-th frame (1 = all).
    every:      u64,
    frames:     u64,
    last_error: Option<OutputError>,
}

impl<W: FrameWriter> FrameOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self::every(writer, 1)
    }

    /// Export only one frame out of `every` (clamped to at least 1).
    pub fn every(writer: W, every: u64) -> Self {
        Self { writer, every: every.max(1), frames: 0, last_error: None }
    }

    /// Frames seen so far, exported or not.
    #[inline]
    pub fn frames_seen(&self) -> u64 {
        self.frames
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // First error wins.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: FrameWriter> FrameObserver for FrameOutputObserver<W> {
    fn on_frame(&mut self, now: Duration, frame: &Frame) {
        let index = self.frames;
        self.frames += 1;
        if index % self.every != 0 {
            return;
        }

        let rows = entity_rows(index, frame);
        if !rows.is_empty() {
            let result = self.writer.write_entities(&rows);
            self.store_err(result);
        }

        let summary = FrameSummaryRow {
            frame:         index,
            real_ms:       now.as_millis() as u64,
            time:          frame.time,
            passengers:    frame.passengers.len() as u64,
            vehicles:      frame.vehicles.len() as u64,
            stops:         frame.stops.len() as u64,
            not_displayed: frame.not_displayed().count() as u64,
        };
        let result = self.writer.write_summary(&summary);
        self.store_err(result);
    }

    fn on_end(&mut self, _last_time: Option<Timestamp>) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
