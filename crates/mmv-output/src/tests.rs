//! Unit tests for mmv-output.

use std::collections::BTreeMap;

use mmv_animation::{AnimatedStop, Frame, PassengerFrame, VehicleFrame};
use mmv_core::{GeoPoint, PassengerId, PassengerStatus, StopId, VehicleId, VehicleStatus};
use mmv_timeline::NotDisplayedReason;

fn sample_frame(time: f64) -> Frame {
    let stop_pos = GeoPoint::new(45.5, -73.6);
    let stop_id = StopId::from_position(stop_pos);
    let bus = VehicleId::from("bus");
    let rider = PassengerId::from("rider");
    let lost = PassengerId::from("lost");

    let mut passengers = BTreeMap::new();
    passengers.insert(rider.clone(), PassengerFrame {
        id:         rider.clone(),
        status:     PassengerStatus::Onboard,
        position:   Some(GeoPoint::new(45.51, -73.61)),
        vehicle_id: Some(bus.clone()),
        stop:       None,
        number_of_passengers: 2,
        not_displayed_reason: None,
    });
    passengers.insert(lost.clone(), PassengerFrame {
        id:         lost,
        status:     PassengerStatus::Assigned,
        position:   None,
        vehicle_id: None,
        stop:       None,
        number_of_passengers: 1,
        not_displayed_reason: Some(NotDisplayedReason::VehicleNotFound),
    });

    let mut vehicles = BTreeMap::new();
    vehicles.insert(bus.clone(), VehicleFrame {
        id:       bus,
        status:   VehicleStatus::Enroute,
        position: Some(GeoPoint::new(45.51, -73.61)),
        stop:     None,
        passenger_ids: vec![rider],
        number_of_passengers: 2,
        not_displayed_reason: None,
    });

    let mut stops = BTreeMap::new();
    stops.insert(stop_id.clone(), AnimatedStop {
        id:            stop_id,
        label:         "Berri".into(),
        position:      stop_pos,
        vehicle_ids:   Vec::new(),
        passenger_ids: Vec::new(),
        number_of_passengers: 0,
        number_of_complete_passengers: 0,
    });

    Frame { time, passengers, vehicles, stops }
}

#[cfg(test)]
mod rows {
    use super::sample_frame;
    use crate::{EntityKind, entity_rows};

    #[test]
    fn one_row_per_entity_in_kind_order() {
        let rows = entity_rows(7, &sample_frame(12.0));
        let kinds: Vec<EntityKind> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Passenger, EntityKind::Passenger, EntityKind::Vehicle, EntityKind::Stop]);
        assert!(rows.iter().all(|r| r.frame == 7 && r.time == 12.0));

        // Passengers sorted by id: "lost" before "rider".
        assert_eq!(rows[0].id, "lost");
        assert_eq!(rows[0].not_displayed_reason, Some("Vehicle not found"));
        assert_eq!(rows[0].latitude, None);

        assert_eq!(rows[1].attached_to.as_deref(), Some("bus"));
        assert_eq!(rows[1].status, "onboard");
        assert_eq!(rows[1].passengers, 2);

        assert_eq!(rows[3].id, "45.5,-73.6");
        assert_eq!(rows[3].status, "");
    }
}

#[cfg(test)]
mod csv_tests {
    use std::time::Duration;

    use mmv_control::FrameObserver;
    use tempfile::TempDir;

    use super::sample_frame;
    use crate::{FrameCsvWriter, FrameOutputObserver, FrameWriter, entity_rows};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn records(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn headers_written() {
        let dir = tmp();
        let mut w = FrameCsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("entity_frames.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers[..4], ["frame", "time", "kind", "id"]);
        assert_eq!(headers.len(), 10);

        let mut rdr = csv::Reader::from_path(dir.path().join("frame_summaries.csv")).unwrap();
        assert_eq!(rdr.headers().unwrap().len(), 7);
    }

    #[test]
    fn entity_rows_written() {
        let dir = tmp();
        let mut w = FrameCsvWriter::new(dir.path()).unwrap();
        w.write_entities(&entity_rows(0, &sample_frame(3.5))).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "entity_frames.csv");
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[0][1], "3.5");
        assert_eq!(&rows[0][2], "passenger");
        assert_eq!(&rows[0][5], ""); // no position
        assert_eq!(&rows[0][9], "Vehicle not found");
        assert_eq!(&rows[2][2], "vehicle");
        assert_eq!(&rows[2][5], "45.51");
    }

    #[test]
    fn observer_exports_every_nth_frame() {
        let dir = tmp();
        let writer = FrameCsvWriter::new(dir.path()).unwrap();
        let mut obs = FrameOutputObserver::every(writer, 2);

        for i in 0..5 {
            obs.on_frame(Duration::from_millis(100 * i), &sample_frame(i as f64));
        }
        obs.on_end(Some(4.0));
        assert!(obs.take_error().is_none());
        assert_eq!(obs.frames_seen(), 5);

        let summaries = records(&dir, "frame_summaries.csv");
        let frames: Vec<&str> = summaries.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(frames, vec!["0", "2", "4"]);
        assert_eq!(&summaries[1][1], "200");
        assert_eq!(&summaries[1][6], "1"); // one passenger not displayed

        assert_eq!(records(&dir, "entity_frames.csv").len(), 12);
    }
}
