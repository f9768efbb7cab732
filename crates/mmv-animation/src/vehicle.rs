//! Vehicle fragments.
//!
//! A route alternates between dwelling at a stop and travelling to the next
//! one:
//!
//! ```text
//!  arrival₀   departure₀        arrival₁   departure₁
//!     │── at stop 0 ──│── moving ──│── at stop 1 ──│── …
//! ```
//!
//! The last stop without a departure holds the vehicle until the end of the
//! window.

use mmv_core::Timestamp;
use mmv_model::{Vehicle, VehiclePolylines, dedupe_stops};
use mmv_timeline::{Fragment, IntervalData, NotDisplayedReason, Window};

/// Sparse fragments for `vehicle` over `window`.
///
/// A vehicle without stops or without polylines yields a single
/// whole-window `NotDisplayed` fragment.
pub fn vehicle_fragments(vehicle: &Vehicle, polylines: Option<&VehiclePolylines>, window: Window) -> Vec<Fragment> {
    let all = vehicle.all_stops();
    let stops = dedupe_stops(&all);
    if stops.is_empty() {
        return vec![whole(window, NotDisplayedReason::VehicleHasNoStops)];
    }
    let Some(polylines) = polylines else {
        return vec![whole(window, NotDisplayedReason::VehicleHasNoPolylines)];
    };

    let mut out = Vec::with_capacity(stops.len() * 2);
    let mut push = |start: Timestamp, end: Timestamp, data: IntervalData| {
        let (start, end) = (start.max(window.start), end.min(window.end));
        if end > start {
            out.push(Fragment::new(start, end, data));
        }
    };

    for (k, &(index, stop)) in stops.iter().enumerate() {
        let next = stops.get(k + 1);

        let position = match index {
            0 => stop.position,
            _ => polylines.get(index).and_then(|p| p.end()).unwrap_or(stop.position),
        };
        let dwell_end = stop
            .departure_time
            .or(next.map(|(_, s)| s.arrival_time))
            .unwrap_or(f64::INFINITY);
        push(stop.arrival_time, dwell_end, IntervalData::at_stop(position, vehicle.id.clone(), index));

        if let (Some(departure), Some(&(next_index, next_stop))) = (stop.departure_time, next) {
            let data = match polylines.get(next_index) {
                Some(polyline) if !polyline.is_empty() => {
                    IntervalData::moving(polyline.clone(), departure, next_stop.arrival_time)
                }
                _ => IntervalData::NotDisplayed(NotDisplayedReason::PolylineNotFound),
            };
            push(departure, next_stop.arrival_time, data);
        }
    }

    out
}

fn whole(window: Window, reason: NotDisplayedReason) -> Fragment {
    Fragment::new(window.start, window.end, IntervalData::NotDisplayed(reason))
}
