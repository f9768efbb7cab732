//! Stop position resolution.
//!
//! The authoritative position of stop `i` on a route is where the polyline
//! arriving at it ends, since that is where the vehicle is drawn when it
//! stops.  Stop 0 has no arriving path, so its own position is used; so is
//! any stop whose arriving polyline is empty.

use mmv_model::{Vehicle, VehiclePolylines};
use mmv_timeline::{IntervalData, NotDisplayedReason};

/// Resolve the display data for `vehicle`'s stop `index`.
///
/// `missing` is the reason reported when `index` is `None` (the leg does not
/// name a boarding or alighting stop).
pub fn stop_data(
    vehicle: &Vehicle,
    polylines: Option<&VehiclePolylines>,
    index: Option<usize>,
    missing: NotDisplayedReason,
) -> Result<IntervalData, NotDisplayedReason> {
    let index = index.ok_or(missing)?;
    let polylines = polylines.ok_or(NotDisplayedReason::VehicleHasNoPolylines)?;
    let stop = vehicle.stop_at(index).ok_or(NotDisplayedReason::StopNotFound)?;

    let position = if index == 0 {
        stop.position
    } else {
        let polyline = polylines.get(index).ok_or(NotDisplayedReason::PolylineNotFound)?;
        polyline.end().unwrap_or(stop.position)
    };

    Ok(IntervalData::at_stop(position, vehicle.id.clone(), index))
}

/// Unwrap a resolution result into interval data, turning failures into a
/// `NotDisplayed` payload.
#[inline]
pub fn or_not_displayed(result: Result<IntervalData, NotDisplayedReason>) -> IntervalData {
    result.unwrap_or_else(IntervalData::NotDisplayed)
}
