//! Unit tests for mmv-timeline.

#[cfg(test)]
mod helpers {
    use mmv_core::GeoPoint;
    use mmv_model::Polyline;

    use crate::{Fragment, IntervalData};

    pub fn pt(lat: f64) -> GeoPoint {
        GeoPoint::new(lat, 0.0)
    }

    pub fn at(lat: f64, start: f64, end: f64) -> Fragment {
        Fragment::new(start, end, IntervalData::at(pt(lat)))
    }

    pub fn moving(from: f64, to: f64, start: f64, end: f64) -> Fragment {
        Fragment::new(start, end, IntervalData::moving(Polyline::straight(pt(from), pt(to)), start, end))
    }
}

#[cfg(test)]
mod build {
    use super::helpers::{at, moving, pt};
    use crate::{Fragment, IntervalData, NotDisplayedReason, Timeline, TimelineError, Window};

    #[test]
    fn no_fragments_is_position_unknown() {
        let t = Timeline::build(Window::new(0.0, 10.0), Vec::new()).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.intervals()[0].not_displayed_reason(), Some(NotDisplayedReason::PositionUnknown));
    }

    #[test]
    fn leading_gap_takes_next_position_and_merges() {
        let t = Timeline::build(Window::new(0.0, 100.0), vec![at(1.0, 10.0, 100.0)]).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!((t.intervals()[0].start, t.intervals()[0].end), (0.0, 100.0));
    }

    #[test]
    fn gap_after_moving_parks_at_polyline_end() {
        let w = Window::new(0.0, 30.0);
        let t = Timeline::build(w, vec![moving(0.0, 5.0, 0.0, 10.0), moving(7.0, 9.0, 20.0, 30.0)]).unwrap();
        assert_eq!(t.len(), 3);
        let gap = &t.intervals()[1];
        assert_eq!((gap.start, gap.end), (10.0, 20.0));
        assert_eq!(gap.data, IntervalData::at(pt(5.0)));
    }

    #[test]
    fn gap_after_not_displayed_uses_later_start() {
        let w = Window::new(0.0, 30.0);
        let frags = vec![
            Fragment::new(0.0, 10.0, IntervalData::NotDisplayed(NotDisplayedReason::StopNotFound)),
            moving(3.0, 4.0, 20.0, 30.0),
        ];
        let t = Timeline::build(w, frags).unwrap();
        assert_eq!(t.intervals()[1].data, IntervalData::at(pt(3.0)));
    }

    #[test]
    fn zero_length_fragments_are_dropped() {
        let t = Timeline::build(Window::new(0.0, 10.0), vec![at(1.0, 0.0, 5.0), at(2.0, 5.0, 5.0), at(3.0, 5.0, 10.0)])
            .unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn zero_length_window() {
        let t = Timeline::build(Window::new(4.0, 4.0), vec![at(1.0, 4.0, 4.0)]).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.intervals()[0].data, IntervalData::at(pt(1.0)));
        assert!(t.sample(4.0).is_some());
    }

    #[test]
    fn corrupt_input_is_rejected() {
        let w = Window::new(0.0, 10.0);
        assert!(matches!(
            Timeline::build(w, vec![at(1.0, 6.0, 5.0)]),
            Err(TimelineError::InvalidFragment { index: 0, .. })
        ));
        assert!(matches!(
            Timeline::build(w, vec![at(1.0, 0.0, 6.0), at(2.0, 5.0, 8.0)]),
            Err(TimelineError::Overlap { index: 1, .. })
        ));
        assert!(matches!(
            Timeline::build(w, vec![at(1.0, 0.0, 11.0)]),
            Err(TimelineError::OutsideWindow { index: 0, .. })
        ));
        assert!(matches!(
            Timeline::build(Window::new(5.0, 1.0), Vec::new()),
            Err(TimelineError::InvalidWindow { .. })
        ));
    }
}

#[cfg(test)]
mod sample {
    use mmv_model::Polyline;

    use super::helpers::{at, moving, pt};
    use crate::{Fragment, IntervalData, Timeline, Window};

    #[test]
    fn half_open_intervals() {
        let t = Timeline::build(Window::new(0.0, 20.0), vec![at(1.0, 0.0, 10.0), at(2.0, 10.0, 20.0)]).unwrap();
        assert_eq!(t.sample(9.99).unwrap().start, 0.0);
        assert_eq!(t.sample(10.0).unwrap().start, 10.0);
        assert_eq!(t.sample(20.0).unwrap().start, 10.0);
        assert!(t.sample(-0.1).is_none());
        assert!(t.sample(20.1).is_none());
    }

    #[test]
    fn moving_position_interpolates() {
        let t = Timeline::build(Window::new(0.0, 10.0), vec![moving(0.0, 10.0, 0.0, 10.0)]).unwrap();
        let iv = t.sample(2.5).unwrap();
        assert_eq!(iv.position_at(2.5), Some(pt(2.5)));
        assert_eq!(iv.position_at(10.0), Some(pt(10.0)));
    }

    #[test]
    fn clipped_moving_keeps_journey_progress() {
        // Journey 0 → 10 from t=0 to t=10, but only [5, 10] is in the window.
        let data = IntervalData::moving(Polyline::straight(pt(0.0), pt(10.0)), 0.0, 10.0);
        let t = Timeline::build(Window::new(5.0, 10.0), vec![Fragment::new(5.0, 10.0, data)]).unwrap();
        assert_eq!(t.sample(5.0).unwrap().position_at(5.0), Some(pt(5.0)));
    }
}

#[cfg(test)]
mod continuity {
    use crate::interval::AnimationInterval;
    use crate::{IntervalData, NotDisplayedReason, Timeline, TimelineError, Window};

    fn nd(start: f64, end: f64) -> AnimationInterval<()> {
        AnimationInterval {
            start,
            end,
            status: (),
            data: IntervalData::NotDisplayed(NotDisplayedReason::PositionUnknown),
        }
    }

    #[test]
    fn detects_holes_and_window_mismatch() {
        let w = Window::new(0.0, 10.0);
        assert!(matches!(
            Timeline::from_intervals(w, vec![nd(0.0, 4.0), nd(5.0, 10.0)]),
            Err(TimelineError::Discontinuity { index: 0, .. })
        ));
        assert!(matches!(
            Timeline::from_intervals(w, vec![nd(0.0, 9.0)]),
            Err(TimelineError::WindowMismatch { .. })
        ));
        assert!(Timeline::<()>::from_intervals(w, Vec::new()).is_err());
        assert!(Timeline::from_intervals(w, vec![nd(0.0, 4.0), nd(4.0, 10.0)]).is_ok());
    }
}

#[cfg(test)]
mod status {
    use super::helpers::at;
    use crate::{StatusChange, Timeline, Window, splice_statuses};

    #[test]
    fn splits_at_changes_inside_intervals() {
        let t = Timeline::build(Window::new(0.0, 100.0), vec![at(1.0, 0.0, 50.0), at(2.0, 50.0, 100.0)]).unwrap();
        let events = vec![StatusChange::new(20.0, 1, 'b'), StatusChange::new(50.0, 2, 'c'), StatusChange::new(70.0, 3, 'd')];
        let s = splice_statuses(t, 'a', &events).unwrap();
        let got: Vec<(f64, f64, char)> = s.intervals().iter().map(|iv| (iv.start, iv.end, iv.status)).collect();
        assert_eq!(got, vec![(0.0, 20.0, 'a'), (20.0, 50.0, 'b'), (50.0, 70.0, 'c'), (70.0, 100.0, 'd')]);
    }

    #[test]
    fn events_before_window_set_initial_status() {
        let t = Timeline::build(Window::new(10.0, 20.0), vec![at(1.0, 10.0, 20.0)]).unwrap();
        let s = splice_statuses(t, 0, &[StatusChange::new(5.0, 1, 7)]).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.intervals()[0].status, 7);
    }

    #[test]
    fn simultaneous_events_later_order_wins() {
        let t = Timeline::build(Window::new(0.0, 10.0), vec![at(1.0, 0.0, 10.0)]).unwrap();
        let events = [StatusChange::new(5.0, 9, "late"), StatusChange::new(5.0, 4, "early")];
        let s = splice_statuses(t, "init", &events).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.intervals()[1].status, "late");
    }
}

#[cfg(test)]
mod randomized {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::helpers::{at, moving};
    use crate::{Fragment, StatusChange, Timeline, Window, splice_statuses};

    fn random_fragments(rng: &mut SmallRng, window: Window) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut cursor = window.start;
        while cursor < window.end {
            let start = (cursor + rng.gen_range(0.0..5.0)).min(window.end);
            let end = (start + rng.gen_range(0.0..10.0)).min(window.end);
            let lat = rng.gen_range(0..4) as f64;
            out.push(if rng.gen_bool(0.5) { at(lat, start, end) } else { moving(lat, lat + 1.0, start, end) });
            cursor = end;
            if rng.gen_bool(0.1) {
                break;
            }
        }
        out
    }

    /// Every built and spliced timeline is gap-free, and no status change
    /// falls strictly inside an interval.
    #[test]
    fn gap_free_and_piecewise_constant() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let start = rng.gen_range(0.0..50.0);
            let window = Window::new(start, start + rng.gen_range(1.0..120.0));
            let timeline = Timeline::build(window, random_fragments(&mut rng, window)).unwrap();
            timeline.check_continuity().unwrap();

            let events: Vec<StatusChange<u8>> = (0..rng.gen_range(0..8))
                .map(|order| StatusChange::new(rng.gen_range(window.start - 5.0..window.end + 5.0), order, rng.r#gen()))
                .collect();
            let spliced = splice_statuses(timeline, 0u8, &events).unwrap();
            spliced.check_continuity().unwrap();

            for iv in spliced.intervals() {
                assert!(
                    events.iter().all(|e| !(e.timestamp > iv.start && e.timestamp < iv.end)),
                    "status change inside [{}, {})",
                    iv.start,
                    iv.end
                );
            }
        }
    }
}
