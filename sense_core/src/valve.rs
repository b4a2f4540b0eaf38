//! Relay-backed valve with a self-expiring timed-open mode.

use crate::error::{Result, map_hw_error};
use crate::events::{Actuator, Command};
use eyre::WrapErr;
use sense_traits::{Clock, DigitalOutput};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveState {
    Closed,
    Open,
    /// Open with a pending auto-close deadline.
    OpenTimed,
}

#[derive(Debug, Clone, Copy)]
struct OpenTimer {
    started_ms: u64,
    duration_ms: u64,
}

/// Binary valve actuator. Exactly one deadline exists at a time: `open()`
/// and `close()` always cancel a pending timed close, and a second
/// `open_timed()` restarts the window. Last command wins.
pub struct TimedValve<O: DigitalOutput> {
    out: O,
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    is_open: bool,
    timer: Option<OpenTimer>,
}

impl<O: DigitalOutput> TimedValve<O> {
    /// Construct a closed valve, driving the output low.
    pub fn new(mut out: O, clock: Arc<dyn Clock + Send + Sync>) -> Result<Self> {
        out.write(false)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("valve init")?;
        let epoch = clock.now();
        Ok(Self {
            out,
            clock,
            epoch,
            is_open: false,
            timer: None,
        })
    }

    pub fn open(&mut self) -> Result<()> {
        self.timer = None;
        self.set(true).wrap_err("valve open")
    }

    pub fn close(&mut self) -> Result<()> {
        self.timer = None;
        self.set(false).wrap_err("valve close")
    }

    /// Open now and schedule an automatic close after `duration`.
    pub fn open_timed(&mut self, duration: Duration) -> Result<()> {
        let started_ms = self.clock.ms_since(self.epoch);
        let duration_ms = duration.as_millis().min(u128::from(u64::MAX)) as u64;
        self.set(true).wrap_err("valve open timed")?;
        self.timer = Some(OpenTimer {
            started_ms,
            duration_ms,
        });
        tracing::debug!(duration_ms, "valve opened on timer");
        Ok(())
    }

    /// Close the valve once its timer has expired (`elapsed >= duration`,
    /// so the exact boundary closes). Idempotent; safe to call every cycle
    /// in any state.
    pub fn tick(&mut self) -> Result<()> {
        let Some(timer) = self.timer else {
            return Ok(());
        };
        let now = self.clock.ms_since(self.epoch);
        if now.saturating_sub(timer.started_ms) >= timer.duration_ms {
            tracing::debug!("valve timer expired");
            self.close()?;
        }
        Ok(())
    }

    pub fn state(&self) -> ValveState {
        if !self.is_open {
            ValveState::Closed
        } else if self.timer.is_some() {
            ValveState::OpenTimed
        } else {
            ValveState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn timer_active(&self) -> bool {
        self.timer.is_some()
    }

    fn set(&mut self, high: bool) -> Result<()> {
        self.out
            .write(high)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))?;
        self.is_open = high;
        Ok(())
    }
}

impl<O: DigitalOutput> Actuator for TimedValve<O> {
    fn accepts(&self, command: &Command) -> bool {
        matches!(
            command,
            Command::OpenValve | Command::CloseValve | Command::OpenValveTimed(_)
        )
    }

    fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::OpenValve => self.open(),
            Command::CloseValve => self.close(),
            Command::OpenValveTimed(duration) => self.open_timed(*duration),
            other => {
                debug_assert!(false, "valve cannot apply {other:?}");
                Ok(())
            }
        }
    }
}
