pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::time::Duration;

/// Pulse-timing range probe (HC-SR04 style trigger/echo).
///
/// One call performs one triggered round trip. `Ok(None)` means the echo
/// did not arrive within `timeout` and the caller should treat the cycle
/// as "no measurement"; `Err` is reserved for real I/O faults.
pub trait EchoProbe {
    fn measure_echo(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<Duration>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Raw analog concentration proxy (MQ-2 style sensing resistance).
pub trait AnalogSensor {
    fn read_raw(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>>;
}

/// Binary actuation sink: relay coil, LED, valve driver.
pub trait DigitalOutput {
    fn write(&mut self, high: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Cosmetic line-oriented display sink. The core never depends on its
/// success; failures are the integrator's problem.
pub trait Display {
    fn render(&mut self, lines: &[String]) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
