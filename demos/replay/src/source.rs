//! In-memory data source answering like the simulation server.
//!
//! Requests are queued and answered after the frame that issued them, so the
//! visualizer sees the same "request now, data later" flow as with a real
//! server.

use std::collections::VecDeque;

use mmv_control::{DataSource, StatesRequest, StatesResponse, Visualizer};
use mmv_core::SimulationId;
use mmv_model::{AllPolylines, SimulationState};
use tracing::debug;

/// Saved states returned before and after the anchor state.
const STATES_BEFORE: usize = 1;
const STATES_AFTER:  usize = 1;

enum Reply {
    States(StatesResponse),
    Polylines(SimulationId, AllPolylines),
    Failed { simulation_id: SimulationId, states: bool, reason: String },
}

pub struct ReplaySource {
    simulation_id: SimulationId,
    /// Sorted by timestamp, then order.
    states:    Vec<SimulationState>,
    polylines: AllPolylines,
    replies:   VecDeque<Reply>,
    pub states_requests:    usize,
    pub polylines_requests: usize,
}

impl ReplaySource {
    pub fn new(simulation_id: SimulationId, mut states: Vec<SimulationState>, polylines: AllPolylines) -> Self {
        states.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp).then(a.order.cmp(&b.order)));
        Self {
            simulation_id,
            states,
            polylines,
            replies: VecDeque::new(),
            states_requests: 0,
            polylines_requests: 0,
        }
    }

    /// States around the requested time that the client does not already
    /// hold.  Known states are listed as kept instead, except the last saved
    /// one which may still be growing.
    fn missing_states(&self, request: &StatesRequest) -> StatesResponse {
        let mut response = StatesResponse { simulation_id: request.simulation_id.clone(), ..Default::default() };
        let Some(last_index) = self.states.len().checked_sub(1) else {
            return response;
        };

        let anchor = self
            .states
            .partition_point(|s| s.timestamp <= request.visualization_time)
            .saturating_sub(1);
        let first = anchor.saturating_sub(STATES_BEFORE);
        let last = (anchor + STATES_AFTER).min(last_index);

        for (index, state) in self.states.iter().enumerate().take(last + 1).skip(first) {
            if index != last_index && request.known_orders.contains(&state.order) {
                response.state_orders_to_keep.push(state.order);
            } else {
                response.states.push(state.clone());
            }
        }
        response
    }

    /// Deliver queued answers.  Returns the number of replies delivered.
    pub fn deliver(&mut self, vis: &mut Visualizer) -> usize {
        let mut delivered = 0;
        while let Some(reply) = self.replies.pop_front() {
            delivered += 1;
            match reply {
                Reply::States(response) => {
                    vis.on_states_received(response);
                }
                Reply::Polylines(id, polylines) => vis.on_polylines_received(&id, polylines),
                Reply::Failed { simulation_id, states: true, reason } => vis.on_states_failed(&simulation_id, &reason),
                Reply::Failed { simulation_id, states: false, reason } => {
                    vis.on_polylines_failed(&simulation_id, &reason)
                }
            }
        }
        delivered
    }
}

impl DataSource for ReplaySource {
    fn request_states(&mut self, request: &StatesRequest) {
        self.states_requests += 1;
        if request.simulation_id != self.simulation_id {
            self.replies.push_back(Reply::Failed {
                simulation_id: request.simulation_id.clone(),
                states: true,
                reason: format!("unknown simulation {}", request.simulation_id),
            });
            return;
        }

        let response = self.missing_states(request);
        debug!(
            time = request.visualization_time,
            known = request.known_orders.len(),
            sent = response.states.len(),
            kept = response.state_orders_to_keep.len(),
            "answering states request"
        );
        self.replies.push_back(Reply::States(response));
    }

    fn request_polylines(&mut self, simulation_id: &SimulationId) {
        self.polylines_requests += 1;
        if *simulation_id != self.simulation_id {
            self.replies.push_back(Reply::Failed {
                simulation_id: simulation_id.clone(),
                states: false,
                reason: format!("unknown simulation {simulation_id}"),
            });
            return;
        }
        self.replies.push_back(Reply::Polylines(simulation_id.clone(), self.polylines.clone()));
    }
}
