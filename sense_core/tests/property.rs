use proptest::prelude::*;
use sense_core::{ProximityDetector, ProximityEvent};

const THRESHOLD_CM: f32 = 10.0;

fn readings_strategy() -> impl Strategy<Value = Vec<Option<f32>>> {
    prop::collection::vec(
        prop_oneof![
            1 => Just(None),
            4 => (0.0f32..30.0).prop_map(Some),
        ],
        0..200,
    )
}

proptest! {
    /// For any reading sequence: events strictly alternate starting with
    /// Entered, invalid readings never produce a transition, and the event
    /// count equals the number of boundary crossings over valid readings.
    #[test]
    fn events_alternate_and_invalid_readings_are_inert(readings in readings_strategy()) {
        let mut det = ProximityDetector::new(THRESHOLD_CM).unwrap();
        let mut events = Vec::new();
        for r in &readings {
            if let Some(event) = det.on_reading(*r) {
                events.push(event);
            }
        }

        if let Some(first) = events.first() {
            prop_assert_eq!(*first, ProximityEvent::Entered);
        }
        for pair in events.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }

        let mut in_range = false;
        let mut crossings = 0usize;
        for d in readings.iter().flatten() {
            let now = *d <= THRESHOLD_CM;
            if now != in_range {
                crossings += 1;
                in_range = now;
            }
        }
        prop_assert_eq!(events.len(), crossings);
        prop_assert_eq!(det.in_range(), in_range);
    }

    /// The detector's final state depends only on the last valid reading.
    #[test]
    fn trailing_invalid_readings_preserve_state(
        valid in (0.0f32..30.0),
        tail in 0usize..10,
    ) {
        let mut det = ProximityDetector::new(THRESHOLD_CM).unwrap();
        det.on_reading(Some(valid));
        let state = det.in_range();
        for _ in 0..tail {
            prop_assert_eq!(det.on_reading(None), None);
        }
        prop_assert_eq!(det.in_range(), state);
        prop_assert_eq!(det.last_distance_cm(), Some(valid));
    }
}
