//! Status overlay.
//!
//! Statuses change at discrete instants (an update's timestamp) while
//! positions change over intervals.  Splicing cuts every interval at each
//! status change strictly inside it so that, afterwards, the status is
//! constant over every interval.

use std::cmp::Ordering;

use tracing::error;

use mmv_core::{Order, Timestamp};

use crate::interval::AnimationInterval;
use crate::timeline::Timeline;
use crate::TimelineResult;

/// A status taking effect at `timestamp`.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusChange<S> {
    pub timestamp: Timestamp,
    /// Update order; breaks ties between simultaneous changes.
    pub order:     Order,
    pub status:    S,
}

impl<S> StatusChange<S> {
    #[inline]
    pub fn new(timestamp: Timestamp, order: Order, status: S) -> Self {
        Self { timestamp, order, status }
    }
}

fn chronological<S>(a: &StatusChange<S>, b: &StatusChange<S>) -> Ordering {
    a.timestamp.total_cmp(&b.timestamp).then(a.order.cmp(&b.order))
}

/// Overlay `events` onto `timeline`.
///
/// The status at time `t` is that of the last event (by timestamp, then
/// order) with `timestamp ≤ t`, or `initial` before any event.  Every
/// interval containing an event strictly inside it is split there; the
/// pieces keep the interval's data.
///
/// The result is re-checked for continuity; a violation is logged at
/// `error` level and returned.
pub fn splice_statuses<S: Clone, T>(
    timeline: Timeline<T>,
    initial: S,
    events: &[StatusChange<S>],
) -> TimelineResult<Timeline<S>> {
    let mut events: Vec<&StatusChange<S>> = events.iter().filter(|e| e.timestamp.is_finite()).collect();
    events.sort_by(|a, b| chronological(a, b));

    let window = timeline.window();
    let mut out: Vec<AnimationInterval<S>> = Vec::with_capacity(timeline.len() + events.len());
    let mut current = initial;
    let mut next = 0;

    for iv in timeline.into_intervals() {
        while next < events.len() && events[next].timestamp <= iv.start {
            current = events[next].status.clone();
            next += 1;
        }

        let mut start = iv.start;
        while next < events.len() && events[next].timestamp < iv.end {
            let cut = events[next].timestamp;
            out.push(AnimationInterval { start, end: cut, status: current.clone(), data: iv.data.clone() });
            while next < events.len() && events[next].timestamp == cut {
                current = events[next].status.clone();
                next += 1;
            }
            start = cut;
        }
        out.push(AnimationInterval { start, end: iv.end, status: current.clone(), data: iv.data });
    }

    let spliced = Timeline::from_parts(window, out);
    if let Err(err) = spliced.check_continuity() {
        error!(%err, "status splice broke timeline continuity");
        return Err(err);
    }
    Ok(spliced)
}
