use std::time::{Duration, Instant};
use tracing::trace;

use crate::error::{HwError, Result};

/// HC-SR04 ultrasonic ranger driven over two GPIO lines.
pub struct Hcsr04 {
    trig: rppal::gpio::OutputPin,
    echo: rppal::gpio::InputPin,
}

impl Hcsr04 {
    pub fn new(mut trig: rppal::gpio::OutputPin, echo: rppal::gpio::InputPin) -> Result<Self> {
        trig.set_low(); // trigger idle low
        Ok(Self { trig, echo })
    }

    pub fn open(trig_pin: u8, echo_pin: u8) -> Result<Self> {
        let gpio = rppal::gpio::Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let trig = gpio
            .get(trig_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_output();
        let echo = gpio
            .get(echo_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input();
        Self::new(trig, echo)
    }

    /// One trigger/echo round trip. `Ok(None)` when the echo window closes
    /// without a pulse or the pulse outlives the window.
    pub fn measure_once(&mut self, timeout: Duration) -> Result<Option<Duration>> {
        // 2 us settle, 10 us trigger pulse per the datasheet
        self.trig.set_low();
        spin_wait(Duration::from_micros(2));
        self.trig.set_high();
        spin_wait(Duration::from_micros(10));
        self.trig.set_low();

        let deadline = Instant::now() + timeout;
        while self.echo.is_low() {
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::hint::spin_loop();
        }
        let start = Instant::now();
        while self.echo.is_high() {
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::hint::spin_loop();
        }
        let round_trip = start.elapsed();
        trace!(micros = round_trip.as_micros() as u64, "echo round trip");
        Ok(Some(round_trip))
    }
}

impl sense_traits::EchoProbe for Hcsr04 {
    fn measure_echo(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<Option<Duration>, Box<dyn std::error::Error + Send + Sync>> {
        self.measure_once(timeout).map_err(Into::into)
    }
}

#[inline(always)]
fn spin_wait(d: Duration) {
    let end = Instant::now() + d;
    while Instant::now() < end {
        std::hint::spin_loop();
    }
}
