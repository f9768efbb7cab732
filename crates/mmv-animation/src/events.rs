//! Status events gathered from the updates of the continuous states.

use std::collections::HashMap;

use mmv_core::{PassengerId, PassengerStatus, VehicleId, VehicleStatus};
use mmv_model::SimulationState;
use mmv_timeline::StatusChange;

/// Per-entity status timelines in sparse form: the status each entity had
/// at the start of the continuous run, and every change after it.
#[derive(Debug, Default)]
pub struct StatusEvents {
    pub passenger_initial: HashMap<PassengerId, PassengerStatus>,
    pub vehicle_initial:   HashMap<VehicleId, VehicleStatus>,
    pub passengers:        HashMap<PassengerId, Vec<StatusChange<PassengerStatus>>>,
    pub vehicles:          HashMap<VehicleId, Vec<StatusChange<VehicleStatus>>>,
}

impl StatusEvents {
    /// Collect from `states`, which must be consecutive and linked.
    ///
    /// Initial statuses come from the first state's snapshot; entities
    /// created later start with their creation status.
    pub fn collect(states: &[SimulationState]) -> Self {
        let mut events = StatusEvents::default();

        if let Some(first) = states.first() {
            for (id, p) in &first.passengers {
                events.passenger_initial.insert(id.clone(), p.status);
            }
            for (id, v) in &first.vehicles {
                events.vehicle_initial.insert(id.clone(), v.status);
            }
        }

        for update in states.iter().flat_map(|s| s.updates.iter()) {
            if let Some((id, status)) = update.passenger_status() {
                events.passenger_initial.entry(id.clone()).or_insert(status);
                events
                    .passengers
                    .entry(id.clone())
                    .or_default()
                    .push(StatusChange::new(update.timestamp, update.order, status));
            }
            if let Some((id, status)) = update.vehicle_status() {
                events.vehicle_initial.entry(id.clone()).or_insert(status);
                events
                    .vehicles
                    .entry(id.clone())
                    .or_default()
                    .push(StatusChange::new(update.timestamp, update.order, status));
            }
        }

        events
    }

    pub fn passenger(&self, id: &PassengerId) -> &[StatusChange<PassengerStatus>] {
        self.passengers.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn vehicle(&self, id: &VehicleId) -> &[StatusChange<VehicleStatus>] {
        self.vehicles.get(id).map_or(&[], Vec::as_slice)
    }
}
