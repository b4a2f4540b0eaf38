//! LED actuators: single status lamp and the three-lamp severity bank.

use crate::error::{Result, map_hw_error};
use crate::events::{Actuator, Command};
use crate::level::GasLevel;
use eyre::WrapErr;
use sense_traits::{Clock, DigitalOutput};
use std::time::Duration;

/// Single status lamp with toggle support.
pub struct StatusLed<O: DigitalOutput> {
    out: O,
    lit: bool,
}

impl<O: DigitalOutput> StatusLed<O> {
    /// Construct a dark lamp, driving the output low.
    pub fn new(mut out: O) -> Result<Self> {
        out.write(false)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("led init")?;
        Ok(Self { out, lit: false })
    }

    pub fn on(&mut self) -> Result<()> {
        self.set(true).wrap_err("led on")
    }

    pub fn off(&mut self) -> Result<()> {
        self.set(false).wrap_err("led off")
    }

    pub fn toggle(&mut self) -> Result<()> {
        self.set(!self.lit).wrap_err("led toggle")
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    fn set(&mut self, lit: bool) -> Result<()> {
        self.out
            .write(lit)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))?;
        self.lit = lit;
        Ok(())
    }
}

impl<O: DigitalOutput> Actuator for StatusLed<O> {
    fn accepts(&self, command: &Command) -> bool {
        matches!(
            command,
            Command::LedOn | Command::LedOff | Command::LedToggle
        )
    }

    fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::LedOn => self.on(),
            Command::LedOff => self.off(),
            Command::LedToggle => self.toggle(),
            other => {
                debug_assert!(false, "led cannot apply {other:?}");
                Ok(())
            }
        }
    }
}

/// Green/yellow/red severity lamps. At most one is lit at a time.
pub struct LedBank<O: DigitalOutput> {
    green: StatusLed<O>,
    yellow: StatusLed<O>,
    red: StatusLed<O>,
}

impl<O: DigitalOutput> LedBank<O> {
    pub fn new(green: O, yellow: O, red: O) -> Result<Self> {
        Ok(Self {
            green: StatusLed::new(green)?,
            yellow: StatusLed::new(yellow)?,
            red: StatusLed::new(red)?,
        })
    }

    pub fn all_off(&mut self) -> Result<()> {
        self.green.off()?;
        self.yellow.off()?;
        self.red.off()?;
        Ok(())
    }

    /// Light exactly the lamp matching `level`.
    pub fn show_level(&mut self, level: GasLevel) -> Result<()> {
        self.all_off()?;
        match level {
            GasLevel::Safe => self.green.on(),
            GasLevel::Moderate => self.yellow.on(),
            GasLevel::Critical => self.red.on(),
        }
    }

    /// Startup lamp test: each lamp in turn for one `step`.
    pub fn self_test(&mut self, clock: &dyn Clock, step: Duration) -> Result<()> {
        self.all_off()?;
        clock.sleep(step);
        self.green.on()?;
        clock.sleep(step);
        self.green.off()?;
        self.yellow.on()?;
        clock.sleep(step);
        self.yellow.off()?;
        self.red.on()?;
        clock.sleep(step);
        self.red.off()?;
        Ok(())
    }

    pub fn lit(&self) -> Option<GasLevel> {
        if self.green.is_lit() {
            Some(GasLevel::Safe)
        } else if self.yellow.is_lit() {
            Some(GasLevel::Moderate)
        } else if self.red.is_lit() {
            Some(GasLevel::Critical)
        } else {
            None
        }
    }
}
