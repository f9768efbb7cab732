//! Frame observer trait for diagnostics and export.

use std::time::Duration;

use mmv_animation::Frame;
use mmv_core::Timestamp;

use crate::source::Request;

/// Callbacks invoked by [`Visualizer::frame_observed`][crate::Visualizer::frame_observed].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: request logger
///
/// ```rust,ignore
/// struct RequestLog(Vec<Request>);
///
/// impl FrameObserver for RequestLog {
///     fn on_request(&mut self, _now: Duration, request: &Request) {
///         self.0.push(request.clone());
///     }
/// }
/// ```
pub trait FrameObserver {
    /// Called with every frame produced, including frames re-sampled from
    /// the last good environment while loading.
    fn on_frame(&mut self, _now: Duration, _frame: &Frame) {}

    /// Called for every request handed to the data source.
    fn on_request(&mut self, _now: Duration, _request: &Request) {}

    /// Called once when the visualization ends, with the last wanted time.
    fn on_end(&mut self, _last_time: Option<Timestamp>) {}
}

/// A [`FrameObserver`] that does nothing.
pub struct NoopObserver;

impl FrameObserver for NoopObserver {}
