//! Pulse-timing distance measurement and debounced proximity detection.

use crate::error::{CoreError, Result, map_hw_error};
use eyre::WrapErr;
use sense_traits::EchoProbe;
use std::time::Duration;

/// Speed of sound at room temperature, in centimeters per microsecond.
pub(crate) const SOUND_CM_PER_US: f32 = 0.0343;
/// Plausible measurement window for HC-SR04-class hardware.
const MIN_RANGE_CM: f32 = 2.0;
const MAX_RANGE_CM: f32 = 400.0;

/// Convert an echo round trip into a one-way distance, rejecting results
/// outside the plausible physical window.
fn echo_to_cm(round_trip: Duration) -> Option<f32> {
    let distance_cm = round_trip.as_micros() as f32 * SOUND_CM_PER_US / 2.0;
    (MIN_RANGE_CM..=MAX_RANGE_CM)
        .contains(&distance_cm)
        .then_some(distance_cm)
}

/// Glue between an `EchoProbe` and the distance domain: triggers one
/// measurement per call and normalizes timeouts and implausible results to
/// the `None` sentinel. Probe I/O faults still propagate as errors.
pub struct RangeFinder<P: EchoProbe> {
    probe: P,
    timeout: Duration,
}

impl<P: EchoProbe> RangeFinder<P> {
    pub fn new(probe: P, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(eyre::Report::new(CoreError::Config(
                "echo timeout must be non-zero",
            )));
        }
        Ok(Self { probe, timeout })
    }

    pub fn read_distance_cm(&mut self) -> Result<Option<f32>> {
        let echo = self
            .probe
            .measure_echo(self.timeout)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("range probe")?;
        let distance = echo.and_then(echo_to_cm);
        tracing::trace!(?distance, "range sample");
        Ok(distance)
    }
}

/// Discrete proximity transition relative to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityEvent {
    Entered,
    Exited,
}

/// Debounced two-state proximity detector.
///
/// The single `<=` comparison is used in both travel directions, so a
/// reading exactly at the threshold always counts as in-range. There is no
/// hysteresis band. An invalid reading (`None`) never changes state.
pub struct ProximityDetector {
    threshold_cm: f32,
    in_range: bool,
    last_distance_cm: Option<f32>,
}

impl ProximityDetector {
    pub fn new(threshold_cm: f32) -> Result<Self> {
        if !threshold_cm.is_finite() || threshold_cm <= 0.0 {
            return Err(eyre::Report::new(CoreError::Config(
                "proximity threshold must be finite and > 0",
            )));
        }
        Ok(Self {
            threshold_cm,
            in_range: false,
            last_distance_cm: None,
        })
    }

    /// Feed one reading; emits an event only on a confirmed state change.
    pub fn on_reading(&mut self, distance_cm: Option<f32>) -> Option<ProximityEvent> {
        let d = distance_cm?;
        self.last_distance_cm = Some(d);
        let now_in_range = d <= self.threshold_cm;
        if now_in_range && !self.in_range {
            self.in_range = true;
            tracing::debug!(distance_cm = d, "proximity entered");
            Some(ProximityEvent::Entered)
        } else if !now_in_range && self.in_range {
            self.in_range = false;
            tracing::debug!(distance_cm = d, "proximity exited");
            Some(ProximityEvent::Exited)
        } else {
            None
        }
    }

    pub fn in_range(&self) -> bool {
        self.in_range
    }

    pub fn last_distance_cm(&self) -> Option<f32> {
        self.last_distance_cm
    }

    pub fn threshold_cm(&self) -> f32 {
        self.threshold_cm
    }
}

#[cfg(test)]
mod echo_tests {
    use super::*;

    #[test]
    fn converts_round_trip_at_half_speed_of_sound() {
        // 583 us round trip ~= 10 cm one way
        let d = echo_to_cm(Duration::from_micros(583)).unwrap();
        assert!((d - 10.0).abs() < 0.05, "got {d}");
    }

    #[test]
    fn rejects_outside_physical_window() {
        // ~1 cm: below the 2 cm floor
        assert_eq!(echo_to_cm(Duration::from_micros(58)), None);
        // ~430 cm: beyond the 400 cm ceiling
        assert_eq!(echo_to_cm(Duration::from_micros(25_000)), None);
        assert_eq!(echo_to_cm(Duration::ZERO), None);
    }

    #[test]
    fn window_edges_are_inclusive() {
        // 2 cm -> 116.6 us, 400 cm -> 23_324 us
        assert!(echo_to_cm(Duration::from_micros(117)).is_some());
        assert!(echo_to_cm(Duration::from_micros(23_300)).is_some());
    }
}
