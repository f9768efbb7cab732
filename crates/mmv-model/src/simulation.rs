//! Simulation descriptor as listed by the server.

use serde::{Deserialize, Serialize};

use mmv_core::{SimulationId, SimulationStatus, TimeBounds, Timestamp};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfiguration {
    /// Time at which the simulation is stopped automatically.
    pub max_time: Option<Timestamp>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id:     SimulationId,
    #[serde(default)]
    pub name:   String,
    pub status: SimulationStatus,
    #[serde(default)]
    pub simulation_start_time: Option<Timestamp>,
    #[serde(default)]
    pub simulation_end_time: Option<Timestamp>,
    /// Current simulation time of a running simulation.
    #[serde(default)]
    pub simulation_time: Option<Timestamp>,
    #[serde(default)]
    pub simulation_estimated_end_time: Option<Timestamp>,
    #[serde(default)]
    pub last_update_order: Option<u64>,
    #[serde(default)]
    pub polylines_version: u64,
    #[serde(default)]
    pub configuration: SimulationConfiguration,
}

impl Simulation {
    pub fn new(id: impl Into<SimulationId>, status: SimulationStatus) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            status,
            simulation_start_time: None,
            simulation_end_time: None,
            simulation_time: None,
            simulation_estimated_end_time: None,
            last_update_order: None,
            polylines_version: 0,
            configuration: SimulationConfiguration::default(),
        }
    }

    /// Playable bounds, or `None` while the server has not reported enough
    /// times to define them.
    ///
    /// - start: simulation start time.
    /// - end:   end time, else the estimated end time.
    /// - max:   current time (else start) while running, else end time.
    pub fn time_bounds(&self) -> Option<TimeBounds> {
        let start = self.simulation_start_time?;
        let end = self.simulation_end_time.or(self.simulation_estimated_end_time)?;
        let max = if self.status.is_running() {
            self.simulation_time.unwrap_or(start)
        } else {
            self.simulation_end_time?
        };
        TimeBounds::new(start, end, max).ok()
    }
}
