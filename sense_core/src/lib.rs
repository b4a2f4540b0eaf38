#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Event-driven sensing/actuation core (hardware-agnostic).
//!
//! This crate provides the control logic shared by the touchless faucet and
//! the gas-leak monitor. All hardware interactions go through the
//! `sense_traits` capability traits (`EchoProbe`, `AnalogSensor`,
//! `DigitalOutput`, `Clock`).
//!
//! ## Architecture
//!
//! - **Range**: pulse-timing distance conversion and the debounced
//!   proximity edge detector (`range` module)
//! - **Level**: ordered severity classification over two breakpoints
//!   (`level` module)
//! - **Valve**: binary actuator with a self-expiring timed-open mode
//!   (`valve` module)
//! - **Calibration**: one-shot clean-air baseline with fatal-error gating
//!   (`calib` module)
//! - **Events**: closed event/command vocabulary and synchronous dispatch
//!   (`events` module)
//! - **Devices**: the faucet controller and the gas monitor composed from
//!   the above (`faucet`, `monitor`), driven by the `runner` loops
//!
//! ## Error model
//!
//! Transient invalid readings (echo timeout, implausible distance) are the
//! `None` sentinel: prior state is preserved and the cycle retries
//! naturally. A failed calibration is a `FatalFault`; it is terminal, and
//! the loop stops instead of operating on an untrustworthy baseline.

// Module declarations
pub mod calib;
pub mod conversions;
pub mod error;
pub mod events;
pub mod faucet;
pub mod led;
pub mod level;
pub mod mocks;
pub mod monitor;
pub mod range;
pub mod runner;
pub mod util;
pub mod valve;

pub use calib::{Baseline, CalibrationCfg, GasCurve, calibrate};
pub use error::{CoreError, FatalFault, Result};
pub use events::{Actuator, Command, Dispatcher, Event, Observer};
pub use faucet::{FaucetCfg, FaucetController, FaucetStatus};
pub use led::{LedBank, StatusLed};
pub use level::{GasLevel, LevelBands};
pub use monitor::{GasMonitor, GasReading, MonitorCfg, MonitorStatus};
pub use range::{ProximityDetector, ProximityEvent, RangeFinder};
pub use valve::{TimedValve, ValveState};
