//! The playable window derived from the cache.

use mmv_core::{Order, Timestamp};
use mmv_model::SimulationState;

use crate::cache::StateCache;

/// One edge of the continuous run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StateBound {
    pub timestamp: Timestamp,
    pub order:     Order,
    /// Index of the state in the cache slice the window was computed from.
    pub index:     usize,
}

/// The pair of consecutive states bracketing the wanted time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CurrentState {
    pub start_timestamp: Timestamp,
    pub end_timestamp:   Timestamp,
}

/// Result of one continuity pass.
///
/// The three bounds are either all present (a continuous run exists) or all
/// absent (the cache is empty).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContinuityWindow {
    pub first_continuous_state:     Option<StateBound>,
    pub last_continuous_state:      Option<StateBound>,
    pub current_state:              Option<CurrentState>,
    pub should_request_more_states: bool,
}

impl ContinuityWindow {
    /// No continuous run; more states are needed.
    pub fn empty() -> Self {
        Self {
            first_continuous_state:     None,
            last_continuous_state:      None,
            current_state:              None,
            should_request_more_states: true,
        }
    }

    #[inline]
    pub fn is_established(&self) -> bool {
        self.first_continuous_state.is_some() && self.last_continuous_state.is_some()
    }

    /// `(start, end)` timestamps of the run.
    pub fn time_range(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.first_continuous_state?.timestamp, self.last_continuous_state?.timestamp))
    }

    /// `end - start` of the run, `None` without one.
    pub fn span(&self) -> Option<Timestamp> {
        self.time_range().map(|(start, end)| end - start)
    }

    /// `true` when the run includes `t`.
    pub fn covers(&self, t: Timestamp) -> bool {
        self.time_range().is_some_and(|(start, end)| t >= start && t <= end)
    }

    /// The linked states of the run, borrowed from the cache the window was
    /// computed from.
    pub fn continuous_states<'a>(&self, cache: &'a StateCache) -> &'a [SimulationState] {
        match (self.first_continuous_state, self.last_continuous_state) {
            (Some(first), Some(last)) => cache.states().get(first.index..=last.index).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Orders to report as already known with the next states request.
    ///
    /// While more states are wanted the highest cached order is left out so
    /// the server sends it again: it may be the still-growing last state of
    /// a running simulation.
    pub fn known_orders(&self, cache: &StateCache) -> Vec<Order> {
        let mut orders: Vec<Order> = cache.orders().collect();
        orders.sort_unstable();
        if self.should_request_more_states {
            orders.pop();
        }
        orders
    }
}

impl Default for ContinuityWindow {
    fn default() -> Self {
        Self::empty()
    }
}
