//! Animation intervals and their display payloads.

use std::fmt;

use mmv_core::{GeoPoint, Timestamp, VehicleId};
use mmv_model::Polyline;

// ── NotDisplayedReason ────────────────────────────────────────────────────────

/// Why an entity cannot be drawn during an interval.
///
/// The text of each reason is shown to users as-is.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum NotDisplayedReason {
    PassengerHasNoLeg,
    LegHasNoAssignedVehicle,
    LegHasNoBoardingStop,
    LegHasNoAlightingStop,
    VehicleNotFound,
    VehicleHasNoPolylines,
    VehicleHasNoStops,
    StopNotFound,
    PolylineNotFound,
    PositionUnknown,
    InconsistentTimeline,
}

impl NotDisplayedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            NotDisplayedReason::PassengerHasNoLeg       => "Passenger has no leg",
            NotDisplayedReason::LegHasNoAssignedVehicle => "Leg has no assigned vehicle",
            NotDisplayedReason::LegHasNoBoardingStop    => "Leg has no boarding stop",
            NotDisplayedReason::LegHasNoAlightingStop   => "Leg has no alighting stop",
            NotDisplayedReason::VehicleNotFound         => "Vehicle not found",
            NotDisplayedReason::VehicleHasNoPolylines   => "Vehicle has no polylines",
            NotDisplayedReason::VehicleHasNoStops       => "Vehicle has no stops",
            NotDisplayedReason::StopNotFound            => "Stop not found",
            NotDisplayedReason::PolylineNotFound        => {
                "Vehicle has no polyline between previous and next stop"
            }
            NotDisplayedReason::PositionUnknown         => "Position unknown",
            NotDisplayedReason::InconsistentTimeline    => "Animation timeline is inconsistent",
        }
    }
}

impl fmt::Display for NotDisplayedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── IntervalData ──────────────────────────────────────────────────────────────

/// A stop of a specific vehicle route, by index into its concatenated stops.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct StopRef {
    pub vehicle_id: VehicleId,
    pub stop_index: usize,
}

#[derive(Clone, PartialEq, Debug)]
pub enum IntervalData {
    NotDisplayed(NotDisplayedReason),
    /// Fixed position, optionally at a known route stop.
    Static { position: GeoPoint, stop: Option<StopRef> },
    /// Travelling inside a vehicle; the position comes from its timeline.
    Onboard { vehicle_id: VehicleId },
    /// Travelling along `polyline`, leaving its start at `departure` and
    /// reaching its end at `arrival`.  The span is kept separately from the
    /// interval bounds so clipped or split pieces still interpolate over the
    /// full journey.
    Moving { polyline: Polyline, departure: Timestamp, arrival: Timestamp },
}

impl IntervalData {
    #[inline]
    pub fn at(position: GeoPoint) -> Self {
        IntervalData::Static { position, stop: None }
    }

    #[inline]
    pub fn at_stop(position: GeoPoint, vehicle_id: VehicleId, stop_index: usize) -> Self {
        IntervalData::Static { position, stop: Some(StopRef { vehicle_id, stop_index }) }
    }

    #[inline]
    pub fn moving(polyline: Polyline, departure: Timestamp, arrival: Timestamp) -> Self {
        IntervalData::Moving { polyline, departure, arrival }
    }

    pub fn not_displayed_reason(&self) -> Option<NotDisplayedReason> {
        match self {
            IntervalData::NotDisplayed(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Where the entity is once this interval is over, if known.
    pub fn exit_position(&self) -> Option<GeoPoint> {
        match self {
            IntervalData::Static { position, .. } => Some(*position),
            IntervalData::Moving { polyline, .. } => polyline.end(),
            _ => None,
        }
    }

    /// Where the entity is when this interval begins, if known.
    pub fn entry_position(&self) -> Option<GeoPoint> {
        match self {
            IntervalData::Static { position, .. } => Some(*position),
            IntervalData::Moving { polyline, .. } => polyline.start(),
            _ => None,
        }
    }
}

// ── Fragment / AnimationInterval ──────────────────────────────────────────────

/// An interval before statuses are overlaid.
#[derive(Clone, PartialEq, Debug)]
pub struct Fragment {
    pub start: Timestamp,
    pub end:   Timestamp,
    pub data:  IntervalData,
}

impl Fragment {
    #[inline]
    pub fn new(start: Timestamp, end: Timestamp, data: IntervalData) -> Self {
        Self { start, end, data }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct AnimationInterval<S> {
    pub start:  Timestamp,
    pub end:    Timestamp,
    pub status: S,
    pub data:   IntervalData,
}

impl<S> AnimationInterval<S> {
    #[inline]
    pub fn duration(&self) -> Timestamp {
        self.end - self.start
    }

    #[inline]
    pub fn not_displayed_reason(&self) -> Option<NotDisplayedReason> {
        self.data.not_displayed_reason()
    }

    /// Position at `t` for `Static` and `Moving` intervals.
    ///
    /// `Moving` progress is `(t - departure) / (arrival - departure)`; a
    /// zero-length journey is treated as complete.  `Onboard` and
    /// `NotDisplayed` return `None`: the former is resolved by the caller
    /// through the vehicle's timeline.
    pub fn position_at(&self, t: Timestamp) -> Option<GeoPoint> {
        match &self.data {
            IntervalData::Static { position, .. } => Some(*position),
            IntervalData::Moving { polyline, departure, arrival } => {
                let span = arrival - departure;
                let progress = if span > 0.0 { (t - departure) / span } else { 1.0 };
                polyline.point_at(progress)
            }
            IntervalData::Onboard { .. } | IntervalData::NotDisplayed(_) => None,
        }
    }
}
