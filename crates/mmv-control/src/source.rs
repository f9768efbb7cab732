//! The seam between the engine and whatever fetches simulation data.
//!
//! Requests go out through [`DataSource`]; results come back later through
//! the [`Visualizer`][crate::Visualizer] completion handlers, tagged with the
//! simulation they were requested for.  A source never calls back into the
//! visualizer while a request is being issued.

use mmv_core::{Order, SimulationId, Timestamp};
use mmv_model::SimulationState;

/// Ask the server for the states around `visualization_time` that are not
/// in `known_orders`.
#[derive(Clone, Debug, PartialEq)]
pub struct StatesRequest {
    pub simulation_id:      SimulationId,
    pub visualization_time: Timestamp,
    pub known_orders:       Vec<Order>,
}

/// Answer to a [`StatesRequest`].
#[derive(Clone, Debug, Default)]
pub struct StatesResponse {
    /// Simulation the answered request was made for.
    pub simulation_id:        SimulationId,
    pub states:               Vec<SimulationState>,
    /// Previously known orders the client should keep; every other cached
    /// state is dropped.
    pub state_orders_to_keep: Vec<Order>,
}

/// A request dispatched during a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    States(StatesRequest),
    Polylines(SimulationId),
}

pub trait DataSource {
    fn request_states(&mut self, request: &StatesRequest);

    fn request_polylines(&mut self, simulation_id: &SimulationId);
}
