//! `StateCache` — the fetched states, kept sorted and unique by order.
//!
//! States arrive out of order and in batches.  The cache is the only
//! append-style structure the engine mutates; everything downstream is
//! recomputed from a borrowed slice of it.

use std::collections::HashSet;

use tracing::{trace, warn};

use mmv_core::Order;
use mmv_model::SimulationState;

use crate::{ContinuityError, ContinuityResult};

/// What [`StateCache::insert`] did with a state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Inserted {
    Added,
    /// A state with the same order was already cached and has been replaced.
    /// The last state of a running simulation grows as updates arrive, so the
    /// newest copy wins.
    Replaced,
}

/// Fetched states sorted by `(timestamp, order)`, at most one per order.
#[derive(Clone, Debug, Default)]
pub struct StateCache {
    states: Vec<SimulationState>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All cached states in `(timestamp, order)` order.
    #[inline]
    pub fn states(&self) -> &[SimulationState] {
        &self.states
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&SimulationState> {
        self.states.get(index)
    }

    pub fn orders(&self) -> impl Iterator<Item = Order> + '_ {
        self.states.iter().map(|s| s.order)
    }

    pub fn contains(&self, order: Order) -> bool {
        self.states.iter().any(|s| s.order == order)
    }

    /// Insert `state`, replacing any cached state with the same order.
    ///
    /// # Errors
    ///
    /// [`ContinuityError::RejectedState`] when the state breaks its own
    /// ordering invariants; the cache is left unchanged.
    pub fn insert(&mut self, state: SimulationState) -> ContinuityResult<Inserted> {
        state
            .validate()
            .map_err(|source| ContinuityError::RejectedState { order: state.order, source })?;

        let replaced = match self.states.iter().position(|s| s.order == state.order) {
            Some(i) => {
                self.states.remove(i);
                true
            }
            None => false,
        };

        let at = self.states.partition_point(|s| {
            s.timestamp.total_cmp(&state.timestamp).then(s.order.cmp(&state.order)).is_lt()
        });
        trace!(order = state.order, timestamp = state.timestamp, index = at, replaced, "state cached");
        self.states.insert(at, state);

        Ok(if replaced { Inserted::Replaced } else { Inserted::Added })
    }

    /// Insert every state of a fetched batch; invalid states are logged and
    /// skipped.  Returns the number of states accepted.
    pub fn extend(&mut self, states: impl IntoIterator<Item = SimulationState>) -> usize {
        let mut accepted = 0;
        for state in states {
            match self.insert(state) {
                Ok(_) => accepted += 1,
                Err(err) => warn!(%err, "dropping fetched state"),
            }
        }
        accepted
    }

    /// Keep only the states whose order is in `keep`.  Returns the number of
    /// states dropped.
    pub fn retain_orders(&mut self, keep: &[Order]) -> usize {
        let keep: HashSet<Order> = keep.iter().copied().collect();
        let before = self.states.len();
        self.states.retain(|s| keep.contains(&s.order));
        before - self.states.len()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
