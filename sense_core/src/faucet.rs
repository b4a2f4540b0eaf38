//! Touchless faucet device: measure, detect, pour on a timer.

use crate::error::{CoreError, Result};
use crate::events::{Actuator, Command, Dispatcher, Event, Observer};
use crate::led::StatusLed;
use crate::range::{ProximityDetector, ProximityEvent, RangeFinder};
use crate::valve::{TimedValve, ValveState};
use sense_traits::{Clock, DigitalOutput, EchoProbe};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct FaucetCfg {
    /// Hand-detection threshold.
    pub threshold_cm: f32,
    /// How long one detection keeps the water flowing.
    pub valve_open: Duration,
    /// Throttle between status snapshots handed to the caller.
    pub status_interval: Duration,
    /// Bound on one echo round trip.
    pub echo_timeout: Duration,
}

impl Default for FaucetCfg {
    fn default() -> Self {
        Self {
            threshold_cm: 10.0,
            valve_open: Duration::from_secs(5),
            status_interval: Duration::from_millis(2500),
            echo_timeout: Duration::from_millis(30),
        }
    }
}

/// Point-in-time device snapshot for display/log sinks.
#[derive(Debug, Clone, Copy)]
pub struct FaucetStatus {
    pub distance_cm: Option<f32>,
    pub in_range: bool,
    pub valve: ValveState,
    pub timer_active: bool,
}

pub struct FaucetController<P: EchoProbe, V: DigitalOutput, L: DigitalOutput> {
    finder: RangeFinder<P>,
    detector: ProximityDetector,
    valve: TimedValve<V>,
    status_led: StatusLed<L>,
    valve_open: Duration,
    status_interval_ms: u64,
    dispatcher: Dispatcher,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    last_status_ms: Option<u64>,
}

impl<P: EchoProbe, V: DigitalOutput, L: DigitalOutput> FaucetController<P, V, L> {
    pub fn new(
        probe: P,
        valve_out: V,
        led_out: L,
        cfg: FaucetCfg,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self> {
        if cfg.valve_open.is_zero() {
            return Err(eyre::Report::new(CoreError::Config(
                "valve open duration must be non-zero",
            )));
        }
        if cfg.status_interval.is_zero() {
            return Err(eyre::Report::new(CoreError::Config(
                "status interval must be non-zero",
            )));
        }
        let finder = RangeFinder::new(probe, cfg.echo_timeout)?;
        let detector = ProximityDetector::new(cfg.threshold_cm)?;
        let valve = TimedValve::new(valve_out, clock.clone())?;
        let status_led = StatusLed::new(led_out)?;
        let epoch = clock.now();
        Ok(Self {
            finder,
            detector,
            valve,
            status_led,
            valve_open: cfg.valve_open,
            status_interval_ms: cfg.status_interval.as_millis().min(u128::from(u64::MAX)) as u64,
            dispatcher: Dispatcher::new(),
            clock,
            epoch,
            last_status_ms: None,
        })
    }

    pub fn register_observer(&mut self, observer: Box<dyn Observer>) {
        self.dispatcher.register(observer);
    }

    /// Device goes active: light the status lamp.
    pub fn activate(&mut self) -> Result<()> {
        self.status_led.on()
    }

    /// One control cycle: measure, feed the detector, drive the valve
    /// timer. Returns a status snapshot when the status interval elapsed.
    pub fn poll(&mut self) -> Result<Option<FaucetStatus>> {
        let distance = self.finder.read_distance_cm()?;
        match self.detector.on_reading(distance) {
            Some(ProximityEvent::Entered) => {
                self.dispatcher.publish(&Event::ProximityEntered);
                // Hand approaching: lamp on and start a timed pour.
                self.handle(&Command::LedOn)?;
                self.handle(&Command::OpenValveTimed(self.valve_open))?;
            }
            Some(ProximityEvent::Exited) => {
                // The valve closes on its own timer.
                self.dispatcher.publish(&Event::ProximityExited);
            }
            None => {}
        }
        self.valve.tick()?;
        Ok(self.due_status())
    }

    /// Route an external command to the actuator declaring the capability.
    pub fn handle(&mut self, command: &Command) -> Result<()> {
        let actuators: [&mut dyn Actuator; 2] = [&mut self.valve, &mut self.status_led];
        self.dispatcher.dispatch(actuators, command)
    }

    /// Unthrottled snapshot of the current device state.
    pub fn status(&self) -> FaucetStatus {
        FaucetStatus {
            distance_cm: self.detector.last_distance_cm(),
            in_range: self.detector.in_range(),
            valve: self.valve.state(),
            timer_active: self.valve.timer_active(),
        }
    }

    pub fn valve_state(&self) -> ValveState {
        self.valve.state()
    }

    pub fn status_led_lit(&self) -> bool {
        self.status_led.is_lit()
    }

    fn due_status(&mut self) -> Option<FaucetStatus> {
        let now = self.clock.ms_since(self.epoch);
        let due = match self.last_status_ms {
            None => true,
            Some(at) => now.saturating_sub(at) >= self.status_interval_ms,
        };
        if due {
            self.last_status_ms = Some(now);
            Some(self.status())
        } else {
            None
        }
    }
}
