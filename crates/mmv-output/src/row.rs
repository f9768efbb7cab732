//! Plain data row types written by export backends.

use mmv_animation::Frame;
use mmv_core::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Passenger,
    Vehicle,
    Stop,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Passenger => "passenger",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Stop => "stop",
        }
    }
}

/// One entity at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub frame:     u64,
    pub time:      Timestamp,
    pub kind:      EntityKind,
    pub id:        String,
    /// Wire name of the status; empty for stops.
    pub status:    &'static str,
    pub latitude:  Option<f64>,
    pub longitude: Option<f64>,
    /// Carrying vehicle (passengers) or current stop (passengers, vehicles).
    pub attached_to: Option<String>,
    /// Passengers on board (vehicles) or waiting (stops); group size for a
    /// passenger.
    pub passengers: u32,
    pub not_displayed_reason: Option<&'static str>,
}

/// Summary of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummaryRow {
    pub frame:         u64,
    /// Real time of the frame, in milliseconds since the clock origin.
    pub real_ms:       u64,
    pub time:          Timestamp,
    pub passengers:    u64,
    pub vehicles:      u64,
    pub stops:         u64,
    pub not_displayed: u64,
}

/// Flatten `frame` into entity rows: passengers, then vehicles, then stops,
/// each in id order.
pub fn entity_rows(index: u64, frame: &Frame) -> Vec<EntityRow> {
    let mut rows = Vec::with_capacity(frame.passengers.len() + frame.vehicles.len() + frame.stops.len());

    for p in frame.passengers.values() {
        rows.push(EntityRow {
            frame:       index,
            time:        frame.time,
            kind:        EntityKind::Passenger,
            id:          p.id.to_string(),
            status:      p.status.as_str(),
            latitude:    p.position.map(|g| g.latitude),
            longitude:   p.position.map(|g| g.longitude),
            attached_to: p
                .vehicle_id
                .as_ref()
                .map(ToString::to_string)
                .or_else(|| p.stop.as_ref().map(ToString::to_string)),
            passengers:  p.number_of_passengers,
            not_displayed_reason: p.not_displayed_reason.map(|r| r.as_str()),
        });
    }

    for v in frame.vehicles.values() {
        rows.push(EntityRow {
            frame:       index,
            time:        frame.time,
            kind:        EntityKind::Vehicle,
            id:          v.id.to_string(),
            status:      v.status.as_str(),
            latitude:    v.position.map(|g| g.latitude),
            longitude:   v.position.map(|g| g.longitude),
            attached_to: v.stop.as_ref().map(ToString::to_string),
            passengers:  v.number_of_passengers,
            not_displayed_reason: v.not_displayed_reason.map(|r| r.as_str()),
        });
    }

    for s in frame.stops.values() {
        rows.push(EntityRow {
            frame:       index,
            time:        frame.time,
            kind:        EntityKind::Stop,
            id:          s.id.to_string(),
            status:      "",
            latitude:    Some(s.position.latitude),
            longitude:   Some(s.position.longitude),
            attached_to: None,
            passengers:  s.number_of_passengers,
            not_displayed_reason: None,
        });
    }

    rows
}
