//! Gap-free interval timelines.
//!
//! # Build pipeline
//!
//! ```text
//! fragments (sorted, disjoint, may leave gaps)
//!     │ validate          → TimelineError on corrupt input
//!     │ fill gaps         → synthetic fragments inherit a neighbour's position
//!     │ coalesce          → adjacent fragments with equal data merge
//!     ▼
//! Timeline<()>  ──splice_statuses──►  Timeline<S>
//! ```
//!
//! A built timeline covers its window exactly:
//! `intervals[i].end == intervals[i + 1].start`, the first interval starts
//! at `window.start` and the last ends at `window.end`.

use tracing::error;

use mmv_core::Timestamp;

use crate::interval::{AnimationInterval, Fragment, IntervalData, NotDisplayedReason};
use crate::{TimelineError, TimelineResult};

// ── Window ────────────────────────────────────────────────────────────────────

/// The simulation-time range a timeline covers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Window {
    pub start: Timestamp,
    pub end:   Timestamp,
}

impl Window {
    #[inline]
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if !(self.start <= self.end) {
            return Err(TimelineError::InvalidWindow { start: self.start, end: self.end });
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t <= self.end
    }

    #[inline]
    pub fn clamp(&self, t: Timestamp) -> Timestamp {
        t.max(self.start).min(self.end)
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Timeline<S> {
    window:    Window,
    intervals: Vec<AnimationInterval<S>>,
}

impl Timeline<()> {
    /// Validate `fragments`, fill the gaps between them and coalesce equal
    /// neighbours into a gap-free timeline over `window`.
    ///
    /// Zero-length fragments are dropped.  Any validation failure is logged
    /// at `error` level and returned; the caller must not render the input.
    pub fn build(window: Window, fragments: Vec<Fragment>) -> TimelineResult<Self> {
        let result = fill(window, fragments).and_then(|intervals| {
            let timeline = Timeline { window, intervals };
            timeline.check_continuity()?;
            Ok(timeline)
        });
        if let Err(err) = &result {
            error!(%err, start = window.start, end = window.end, "timeline build failed");
        }
        result
    }
}

impl<S> Timeline<S> {
    /// Assemble a timeline from already gap-free intervals and verify it.
    pub fn from_intervals(window: Window, intervals: Vec<AnimationInterval<S>>) -> TimelineResult<Self> {
        let timeline = Timeline { window, intervals };
        timeline.check_continuity()?;
        Ok(timeline)
    }

    /// Single interval covering the whole window.
    pub fn whole(window: Window, status: S, data: IntervalData) -> Self {
        Timeline {
            window,
            intervals: vec![AnimationInterval { start: window.start, end: window.end, status, data }],
        }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn intervals(&self) -> &[AnimationInterval<S>] {
        &self.intervals
    }

    #[inline]
    pub fn into_intervals(self) -> Vec<AnimationInterval<S>> {
        self.intervals
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Re-verify the gap-free post-condition.
    pub fn check_continuity(&self) -> TimelineResult<()> {
        let (Some(first), Some(last)) = (self.intervals.first(), self.intervals.last()) else {
            return Err(self.mismatch(self.window.start, self.window.start));
        };
        if first.start != self.window.start || last.end != self.window.end {
            return Err(self.mismatch(first.start, last.end));
        }
        for (index, pair) in self.intervals.windows(2).enumerate() {
            if pair[0].end != pair[1].start {
                return Err(TimelineError::Discontinuity {
                    index,
                    end: pair[0].end,
                    next_start: pair[1].start,
                });
            }
        }
        Ok(())
    }

    fn mismatch(&self, start: Timestamp, end: Timestamp) -> TimelineError {
        TimelineError::WindowMismatch {
            start,
            end,
            window_start: self.window.start,
            window_end: self.window.end,
        }
    }

    /// The interval containing `t` (`start ≤ t < end`; the last interval
    /// also contains the window end).  `None` outside the window.
    pub fn sample(&self, t: Timestamp) -> Option<&AnimationInterval<S>> {
        if !self.window.contains(t) {
            return None;
        }
        let i = self.intervals.partition_point(|iv| iv.end <= t);
        self.intervals.get(i).or_else(|| self.intervals.last())
    }

    pub(crate) fn from_parts(window: Window, intervals: Vec<AnimationInterval<S>>) -> Self {
        Timeline { window, intervals }
    }
}

// ── Gap filling ───────────────────────────────────────────────────────────────

fn validate(window: Window, fragments: &[Fragment]) -> TimelineResult<()> {
    window.validate()?;
    let mut previous_end = window.start;
    for (index, f) in fragments.iter().enumerate() {
        if !(f.start <= f.end) {
            return Err(TimelineError::InvalidFragment { index, start: f.start, end: f.end });
        }
        if f.start < window.start || f.end > window.end {
            return Err(TimelineError::OutsideWindow { index, start: f.start, end: f.end });
        }
        if index > 0 && f.start < previous_end {
            return Err(TimelineError::Overlap { index, start: f.start, previous_end });
        }
        previous_end = f.end;
    }
    Ok(())
}

/// Data for a synthetic fragment between `before` and `after`.
fn filler(before: Option<&IntervalData>, after: Option<&IntervalData>) -> IntervalData {
    if let Some(data) = before {
        match data {
            IntervalData::Static { .. } => return data.clone(),
            IntervalData::Moving { polyline, .. } => {
                if let Some(end) = polyline.end() {
                    return IntervalData::at(end);
                }
            }
            _ => {}
        }
    }
    if let Some(data) = after {
        match data {
            IntervalData::Static { .. } => return data.clone(),
            IntervalData::Moving { polyline, .. } => {
                if let Some(start) = polyline.start() {
                    return IntervalData::at(start);
                }
            }
            _ => {}
        }
    }
    IntervalData::NotDisplayed(NotDisplayedReason::PositionUnknown)
}

fn push(out: &mut Vec<AnimationInterval<()>>, start: Timestamp, end: Timestamp, data: IntervalData) {
    if let Some(last) = out.last_mut() {
        if last.data == data && last.end == start {
            last.end = end;
            return;
        }
    }
    out.push(AnimationInterval { start, end, status: (), data });
}

fn fill(window: Window, fragments: Vec<Fragment>) -> TimelineResult<Vec<AnimationInterval<()>>> {
    validate(window, &fragments)?;

    if window.start == window.end {
        let data = fragments
            .into_iter()
            .next()
            .map_or(IntervalData::NotDisplayed(NotDisplayedReason::PositionUnknown), |f| f.data);
        return Ok(vec![AnimationInterval { start: window.start, end: window.end, status: (), data }]);
    }

    let mut out: Vec<AnimationInterval<()>> = Vec::with_capacity(fragments.len() * 2 + 1);
    let mut cursor = window.start;
    for f in fragments.into_iter().filter(|f| f.end > f.start) {
        if f.start > cursor {
            let data = filler(out.last().map(|iv| &iv.data), Some(&f.data));
            push(&mut out, cursor, f.start, data);
        }
        cursor = f.end;
        push(&mut out, f.start, f.end, f.data);
    }
    if cursor < window.end {
        let data = filler(out.last().map(|iv| &iv.data), None);
        push(&mut out, cursor, window.end, data);
    }
    Ok(out)
}
