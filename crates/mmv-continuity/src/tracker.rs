//! `ContinuityTracker` — finds the gap-free run of states around the wanted
//! time and decides whether more states must be fetched.
//!
//! # Linking
//!
//! ```text
//!  state k (order o, updates o+1 … o+n)      state k+1 (order o+n+1)
//!  ├──────────────────────────────────────┤  ├─────────────────────── …
//! ```
//!
//! State `k` links to state `k + 1` when it carries at least one update and
//! the next state's order is exactly one past its last update.  A state
//! without updates cannot vouch for what happened after it, so the run is
//! cut there.

use tracing::trace;

use mmv_core::{TimeBounds, Timestamp};
use mmv_model::SimulationState;

use crate::cache::StateCache;
use crate::window::{ContinuityWindow, CurrentState, StateBound};
use crate::{ContinuityError, ContinuityResult};

/// Default fetch-ahead margin, in simulation seconds.
pub const DEFAULT_FETCH_MARGIN: Timestamp = 30.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContinuityTracker {
    fetch_margin: Timestamp,
}

impl Default for ContinuityTracker {
    fn default() -> Self {
        Self { fetch_margin: DEFAULT_FETCH_MARGIN }
    }
}

/// `true` when `next` continues `state` without a missing order.
#[inline]
pub fn links(state: &SimulationState, next: &SimulationState) -> bool {
    !state.updates.is_empty() && next.order == state.next_order()
}

impl ContinuityTracker {
    /// # Errors
    ///
    /// [`ContinuityError::InvalidMargin`] for a negative or non-finite margin.
    pub fn new(fetch_margin: Timestamp) -> ContinuityResult<Self> {
        if !fetch_margin.is_finite() || fetch_margin < 0.0 {
            return Err(ContinuityError::InvalidMargin(fetch_margin));
        }
        Ok(Self { fetch_margin })
    }

    #[inline]
    pub fn fetch_margin(&self) -> Timestamp {
        self.fetch_margin
    }

    /// Compute the continuity window of `cache` around `wanted`.
    ///
    /// The anchor is the last state starting at or before `wanted` (the first
    /// state when `wanted` precedes them all); the window is the maximal
    /// linked run containing it.
    pub fn compute(&self, cache: &StateCache, wanted: Timestamp, bounds: &TimeBounds) -> ContinuityWindow {
        let states = cache.states();
        if states.is_empty() {
            return ContinuityWindow::empty();
        }

        let anchor = states.partition_point(|s| s.timestamp <= wanted).saturating_sub(1);

        let mut first = anchor;
        while first > 0 && links(&states[first - 1], &states[first]) {
            first -= 1;
        }
        let mut last = anchor;
        while last + 1 < states.len() && links(&states[last], &states[last + 1]) {
            last += 1;
        }

        let first_state = &states[first];
        let last_state = &states[last];
        let first_bound = StateBound { timestamp: first_state.timestamp, order: first_state.order, index: first };
        let last_bound = StateBound {
            timestamp: last_state.end_timestamp(),
            order:     last_state.end_order(),
            index:     last,
        };

        let current = &states[anchor];
        let end_timestamp = if anchor < last {
            states[anchor + 1].timestamp
        } else {
            current.end_timestamp()
        };
        let current_state = CurrentState { start_timestamp: current.timestamp, end_timestamp };

        let should_request_more_states = self.wants_more(first_bound.timestamp, last_bound.timestamp, wanted, bounds);

        trace!(
            first = first_bound.order,
            last = last_bound.order,
            start = first_bound.timestamp,
            end = last_bound.timestamp,
            wanted,
            should_request_more_states,
            "continuity computed"
        );

        ContinuityWindow {
            first_continuous_state: Some(first_bound),
            last_continuous_state: Some(last_bound),
            current_state: Some(current_state),
            should_request_more_states,
        }
    }

    /// Outside the run, or within the margin of an edge that does not
    /// already sit on the simulation bounds.
    fn wants_more(&self, start: Timestamp, end: Timestamp, wanted: Timestamp, bounds: &TimeBounds) -> bool {
        if wanted < start || wanted > end {
            return true;
        }
        let at_start = start <= bounds.start;
        let finished = bounds.max >= bounds.end;
        let at_end = finished && end >= bounds.max;

        let near_start = !at_start && wanted - start < self.fetch_margin;
        let near_end = !at_end && end - wanted < self.fetch_margin;
        near_start || near_end
    }
}
