//! Unit tests for mmv-core primitives.

#[cfg(test)]
mod ids {
    use crate::{GeoPoint, PassengerId, StopId, VehicleId};

    #[test]
    fn ordering_follows_strings() {
        assert!(VehicleId::from("bus-1") < VehicleId::from("bus-2"));
        assert!(PassengerId::new("a") < PassengerId::new("b"));
    }

    #[test]
    fn display_is_raw_id() {
        assert_eq!(VehicleId::from("bus-7").to_string(), "bus-7");
        assert_eq!(PassengerId::new(String::from("p1")).as_str(), "p1");
    }

    #[test]
    fn stop_id_from_position() {
        let id = StopId::from_position(GeoPoint::new(45.5, -73.25));
        assert_eq!(id.as_str(), "45.5,-73.25");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(2.0, 4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), GeoPoint::new(1.0, 2.0));
    }

    #[test]
    fn lerp_clamps_progress() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 1.0);
        assert_eq!(a.lerp(b, 3.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }

    #[test]
    fn planar_distance() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(3.0, 4.0);
        assert!((a.planar_distance(b) - 5.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod time {
    use crate::{CoreError, Tick, TimeBounds};

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(4).next(), Tick(5));
        assert_eq!(Tick(10).since(Tick(4)), 6);
        assert_eq!(Tick(4).since(Tick(10)), 0);
    }

    #[test]
    fn bounds_clamp() {
        let b = TimeBounds::new(100.0, 500.0, 300.0).unwrap();
        assert_eq!(b.clamp(50.0), 100.0);
        assert_eq!(b.clamp(200.0), 200.0);
        assert_eq!(b.clamp(450.0), 300.0);
        assert!(b.contains(300.0));
        assert!(!b.contains(300.5));
    }

    #[test]
    fn bounds_reject_inverted_range() {
        assert_eq!(
            TimeBounds::new(10.0, 20.0, 5.0),
            Err(CoreError::InvalidBounds { start: 10.0, max: 5.0 })
        );
        assert!(TimeBounds::new(f64::NAN, 1.0, 1.0).is_err());
    }
}

#[cfg(test)]
mod status {
    use crate::{PassengerStatus, SimulationStatus, VehicleStatus};

    #[test]
    fn wire_names_round_trip() {
        for s in PassengerStatus::ALL {
            assert_eq!(s.as_str().parse::<PassengerStatus>().unwrap(), *s);
        }
        for s in VehicleStatus::ALL {
            assert_eq!(s.to_string().parse::<VehicleStatus>().unwrap(), *s);
        }
        assert!("flying".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn running_statuses() {
        assert!(SimulationStatus::Running.is_running());
        assert!(SimulationStatus::Lost.is_running());
        assert!(!SimulationStatus::Completed.is_running());
        assert!(!SimulationStatus::Corrupted.is_running());
    }
}
