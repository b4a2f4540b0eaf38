//! Cooperative poll loops for the two devices.
//!
//! One control cycle per iteration, paced by the device's clock; no
//! preemption and no parallel threads. A monitor that halts on a fatal
//! calibration fault terminates the loop with the fault as the error;
//! the caller decides how to report it.

use crate::error::Result;
use crate::faucet::{FaucetController, FaucetStatus};
use crate::monitor::{GasMonitor, GasReading, MonitorStatus};
use crate::util::period_us;
use sense_traits::{AnalogSensor, DigitalOutput, EchoProbe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RunOpts {
    /// Poll rate in Hz.
    pub rate_hz: u32,
    /// Stop after this many cycles; `None` runs until shutdown.
    pub max_cycles: Option<u64>,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            rate_hz: 20,
            max_cycles: None,
        }
    }
}

/// Drive the faucet until shutdown or the cycle cap. `on_status` fires for
/// each due status snapshot.
pub fn run_faucet<P, V, L>(
    faucet: &mut FaucetController<P, V, L>,
    opts: &RunOpts,
    shutdown: &AtomicBool,
    mut on_status: impl FnMut(&FaucetStatus),
) -> Result<()>
where
    P: EchoProbe,
    V: DigitalOutput,
    L: DigitalOutput,
{
    let period = Duration::from_micros(period_us(opts.rate_hz));
    faucet.activate()?;
    tracing::info!(rate_hz = opts.rate_hz, "faucet loop start");
    let mut cycles: u64 = 0;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            return Ok(());
        }
        if let Some(cap) = opts.max_cycles
            && cycles >= cap
        {
            tracing::info!(cycles, "cycle cap reached");
            return Ok(());
        }
        if let Some(status) = faucet.poll()? {
            on_status(&status);
        }
        cycles += 1;
        faucet.clock.sleep(period);
    }
}

/// Drive the monitor until shutdown, the cycle cap, or a fatal halt.
/// Calibration runs once before the loop: live sampling, or the persisted
/// baseline when one is provided. `on_reading` fires for each due snapshot.
pub fn run_monitor<S, O>(
    monitor: &mut GasMonitor<S, O>,
    opts: &RunOpts,
    shutdown: &AtomicBool,
    persisted_r0: Option<f32>,
    mut on_reading: impl FnMut(&GasReading),
) -> Result<()>
where
    S: AnalogSensor,
    O: DigitalOutput,
{
    let period = Duration::from_micros(period_us(opts.rate_hz));
    let status = match persisted_r0 {
        Some(r0) => monitor.start_persisted(r0)?,
        None => monitor.start()?,
    };
    if let MonitorStatus::Halted(fault) = status {
        return Err(crate::error::Report::new(fault));
    }
    tracing::info!(rate_hz = opts.rate_hz, "monitor loop start");
    let mut cycles: u64 = 0;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            return Ok(());
        }
        if let Some(cap) = opts.max_cycles
            && cycles >= cap
        {
            tracing::info!(cycles, "cycle cap reached");
            return Ok(());
        }
        match monitor.poll()? {
            MonitorStatus::Running(snapshot) => {
                if let Some(reading) = snapshot {
                    on_reading(&reading);
                }
            }
            MonitorStatus::Halted(fault) => {
                tracing::error!(error = %fault, "monitor loop stopped");
                return Err(crate::error::Report::new(fault));
            }
        }
        cycles += 1;
        monitor.clock.sleep(period);
    }
}
