//! Passenger fragments.
//!
//! # Leg walk
//!
//! A cursor starts at the window start and moves forward through every leg
//! of the trip (previous, current, next):
//!
//! ```text
//!  assigned        boarding          alighting        next assigned
//!     │── waiting ────│── onboard ──────│── dropped off ───│
//!       Static@board     Onboard{veh}      Static@alight
//! ```
//!
//! The walk stops as soon as a phase has not happened by the window end or
//! a leg cannot be resolved (missing vehicle, missing assignment).

use std::collections::BTreeMap;

use mmv_core::{Timestamp, VehicleId};
use mmv_model::{AllPolylines, Passenger, Vehicle};
use mmv_timeline::{Fragment, IntervalData, NotDisplayedReason, Window};

use crate::position::{or_not_displayed, stop_data};

/// Sparse fragments for `passenger` over `window`.
///
/// Fragments are in time order; zero-length phases are omitted.  An empty
/// trip yields a single whole-window `PassengerHasNoLeg` fragment.
pub fn passenger_fragments(
    passenger: &Passenger,
    vehicles: &BTreeMap<VehicleId, Vehicle>,
    polylines: Option<&AllPolylines>,
    window: Window,
) -> Vec<Fragment> {
    let legs: Vec<_> = passenger.all_legs().collect();
    if legs.is_empty() {
        return vec![Fragment::new(
            window.start,
            window.end,
            IntervalData::NotDisplayed(NotDisplayedReason::PassengerHasNoLeg),
        )];
    }

    let end = window.end;
    let mut out = Vec::new();
    let mut push = |start: Timestamp, stop: Timestamp, data: IntervalData| {
        if stop > start {
            out.push(Fragment::new(start, stop, data));
        }
    };
    let mut cursor = window.start;

    for (i, leg) in legs.iter().enumerate() {
        let (Some(vehicle_id), Some(assigned)) = (&leg.assigned_vehicle_id, leg.assigned_time) else {
            push(cursor, end, IntervalData::NotDisplayed(NotDisplayedReason::LegHasNoAssignedVehicle));
            break;
        };

        cursor = cursor.max(assigned);
        if cursor >= end {
            break;
        }

        let Some(vehicle) = vehicles.get(vehicle_id) else {
            push(cursor, end, IntervalData::NotDisplayed(NotDisplayedReason::VehicleNotFound));
            break;
        };
        let vehicle_polylines = polylines.and_then(|p| p.for_vehicle(vehicle_id));

        // Waiting at the boarding stop.
        if leg.boarding_time.is_none_or(|t| t >= cursor) {
            let until = leg.boarding_time.map_or(end, |t| t.min(end));
            let data = stop_data(vehicle, vehicle_polylines, leg.boarding_stop_index, NotDisplayedReason::LegHasNoBoardingStop);
            push(cursor, until, or_not_displayed(data));
            cursor = until;
            if cursor >= end {
                break;
            }
        }
        let Some(boarding) = leg.boarding_time else { break };

        // Riding.
        if leg.alighting_time.is_none_or(|t| t >= cursor) {
            let from = boarding.max(cursor);
            let until = leg.alighting_time.map_or(end, |t| t.min(end));
            push(from, until, IntervalData::Onboard { vehicle_id: vehicle_id.clone() });
            cursor = until;
            if cursor >= end {
                break;
            }
        }
        let Some(alighting) = leg.alighting_time else { break };

        // Dropped off, until the next leg is assigned.
        let from = alighting.max(cursor);
        let until = legs
            .get(i + 1)
            .and_then(|next| next.assigned_time)
            .map_or(end, |t| t.min(end))
            .max(from);
        let data = stop_data(vehicle, vehicle_polylines, leg.alighting_stop_index, NotDisplayedReason::LegHasNoAlightingStop);
        push(from, until, or_not_displayed(data));
        cursor = until;
    }

    out
}
