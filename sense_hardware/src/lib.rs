pub mod error;
#[cfg(feature = "hardware")]
pub mod hcsr04;

use sense_traits::{AnalogSensor, DigitalOutput, EchoProbe};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Speed of sound used to synthesize the echo a real probe would report.
const SOUND_CM_PER_US: f32 = 0.0343;

/// Simulated ultrasonic probe. The measured distance is shared through a
/// cell handle so scenarios can move the "hand" while the device runs.
pub struct SimulatedProbe {
    distance_cm: Rc<Cell<f32>>,
}

impl SimulatedProbe {
    pub fn new(initial_cm: f32) -> Self {
        SimulatedProbe {
            distance_cm: Rc::new(Cell::new(initial_cm)),
        }
    }

    pub fn distance(&self) -> Rc<Cell<f32>> {
        self.distance_cm.clone()
    }
}

impl EchoProbe for SimulatedProbe {
    fn measure_echo(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<Duration>, Box<dyn std::error::Error + Send + Sync>> {
        let d = self.distance_cm.get();
        if !d.is_finite() || d <= 0.0 {
            tracing::trace!("no echo (simulated)");
            return Ok(None);
        }
        let micros = (d * 2.0 / SOUND_CM_PER_US).round() as u64;
        tracing::trace!(distance_cm = d, micros, "echo (simulated)");
        Ok(Some(Duration::from_micros(micros)))
    }
}

/// Simulated MQ-2 style sensor reporting a shared sensing-resistance value.
pub struct SimulatedGasSensor {
    rs: Rc<Cell<f32>>,
}

impl SimulatedGasSensor {
    pub fn new(initial_rs: f32) -> Self {
        SimulatedGasSensor {
            rs: Rc::new(Cell::new(initial_rs)),
        }
    }

    pub fn value(&self) -> Rc<Cell<f32>> {
        self.rs.clone()
    }
}

impl AnalogSensor for SimulatedGasSensor {
    fn read_raw(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        let rs = self.rs.get();
        tracing::trace!(rs, "gas sample (simulated)");
        Ok(rs)
    }
}

/// Simulated relay/LED line.
pub struct SimulatedOutput {
    name: &'static str,
    level: Rc<Cell<bool>>,
}

impl SimulatedOutput {
    pub fn new(name: &'static str) -> Self {
        SimulatedOutput {
            name,
            level: Rc::new(Cell::new(false)),
        }
    }

    pub fn level(&self) -> Rc<Cell<bool>> {
        self.level.clone()
    }
}

impl DigitalOutput for SimulatedOutput {
    fn write(&mut self, high: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.level.set(high);
        tracing::debug!(name = self.name, high, "output set (simulated)");
        Ok(())
    }
}

#[cfg(feature = "hardware")]
pub use hcsr04::Hcsr04;

#[cfg(feature = "hardware")]
pub struct GpioOutput {
    pin: rppal::gpio::OutputPin,
}

#[cfg(feature = "hardware")]
impl GpioOutput {
    pub fn new(pin_no: u8) -> error::Result<Self> {
        let gpio = rppal::gpio::Gpio::new().map_err(|e| error::HwError::Gpio(e.to_string()))?;
        let pin = gpio
            .get(pin_no)
            .map_err(|e| error::HwError::Gpio(e.to_string()))?
            .into_output();
        Ok(GpioOutput { pin })
    }
}

#[cfg(feature = "hardware")]
impl DigitalOutput for GpioOutput {
    fn write(&mut self, high: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if high {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_probe_round_trips_distance() {
        let mut probe = SimulatedProbe::new(10.0);
        let echo = probe
            .measure_echo(Duration::from_millis(30))
            .unwrap()
            .unwrap();
        // 10 cm one way -> ~583 us round trip
        let micros = echo.as_micros();
        assert!((580..=586).contains(&micros), "got {micros}");
    }

    #[test]
    fn simulated_probe_times_out_on_degenerate_distance() {
        let mut probe = SimulatedProbe::new(10.0);
        probe.distance().set(-1.0);
        assert!(
            probe
                .measure_echo(Duration::from_millis(30))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn simulated_output_reflects_writes() {
        let mut out = SimulatedOutput::new("valve");
        let level = out.level();
        out.write(true).unwrap();
        assert!(level.get());
        out.write(false).unwrap();
        assert!(!level.get());
    }
}
