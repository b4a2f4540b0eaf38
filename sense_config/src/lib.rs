#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the sensing/actuation stack.
//!
//! `Config` and sub-structs are deserialized from TOML and validated.
//! Every section carries defaults matching the reference hardware, so an
//! absent file or empty document is a runnable configuration.
use serde::Deserialize;

/// GPIO assignments for both devices.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pins {
    pub trig: u8,
    pub echo: u8,
    pub valve: u8,
    pub status_led: u8,
    pub gas_adc: u8,
    pub green_led: u8,
    pub yellow_led: u8,
    pub red_led: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            trig: 5,
            echo: 18,
            valve: 19,
            status_led: 2,
            gas_adc: 4,
            green_led: 25,
            yellow_led: 26,
            red_led: 27,
        }
    }
}

/// Touchless faucet knobs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Faucet {
    /// Hand-detection threshold in centimeters.
    pub threshold_cm: f32,
    /// How long one detection keeps the valve open (ms).
    pub valve_open_ms: u64,
    /// Throttle between status snapshots (ms).
    pub status_interval_ms: u64,
    /// Bound on one echo round trip (ms).
    pub echo_timeout_ms: u64,
}

impl Default for Faucet {
    fn default() -> Self {
        Self {
            threshold_cm: 10.0,
            valve_open_ms: 5000,
            status_interval_ms: 2500,
            echo_timeout_ms: 30,
        }
    }
}

/// Gas monitor classification and reporting knobs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Gas {
    /// Safe/Moderate breakpoint (ppm).
    pub low_ppm: f32,
    /// Moderate/Critical breakpoint (ppm).
    pub high_ppm: f32,
    /// Throttle between reading snapshots (ms).
    pub log_interval_ms: u64,
    /// ADC full-scale raw value for the percentage figure.
    pub adc_full_scale: f32,
}

impl Default for Gas {
    fn default() -> Self {
        Self {
            low_ppm: 200.0,
            high_ppm: 500.0,
            log_interval_ms: 1000,
            adc_full_scale: 4095.0,
        }
    }
}

/// Startup calibration knobs.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Calibration {
    /// Number of samples averaged into the baseline.
    pub samples: u32,
    /// Known Rs/R0 ratio in clean air for the sensor family.
    pub clean_air_ratio: f32,
    /// Regression coefficients: ppm = a * (Rs/R0)^b.
    pub curve_a: f32,
    pub curve_b: f32,
    /// Persisted clean-air baseline; skips live sampling when present.
    pub r0: Option<f32>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            samples: 10,
            clean_air_ratio: 9.83,
            curve_a: 574.25,
            curve_b: -2.222,
            r0: None,
        }
    }
}

/// Control loop pacing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Poll {
    pub rate_hz: u32,
}

impl Default for Poll {
    fn default() -> Self {
        Self { rate_hz: 20 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub faucet: Faucet,
    pub gas: Gas,
    pub calibration: Calibration,
    pub poll: Poll,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Faucet
        if !self.faucet.threshold_cm.is_finite() || self.faucet.threshold_cm <= 0.0 {
            eyre::bail!("faucet.threshold_cm must be finite and > 0");
        }
        if self.faucet.valve_open_ms == 0 {
            eyre::bail!("faucet.valve_open_ms must be >= 1");
        }
        if self.faucet.status_interval_ms == 0 {
            eyre::bail!("faucet.status_interval_ms must be >= 1");
        }
        if self.faucet.echo_timeout_ms == 0 {
            eyre::bail!("faucet.echo_timeout_ms must be >= 1");
        }

        // Gas bands
        if !self.gas.low_ppm.is_finite() || self.gas.low_ppm <= 0.0 {
            eyre::bail!("gas.low_ppm must be finite and > 0");
        }
        if !self.gas.high_ppm.is_finite() || self.gas.low_ppm >= self.gas.high_ppm {
            eyre::bail!("gas.low_ppm must be < gas.high_ppm");
        }
        if self.gas.log_interval_ms == 0 {
            eyre::bail!("gas.log_interval_ms must be >= 1");
        }
        if !self.gas.adc_full_scale.is_finite() || self.gas.adc_full_scale <= 0.0 {
            eyre::bail!("gas.adc_full_scale must be finite and > 0");
        }

        // Calibration
        if self.calibration.samples == 0 {
            eyre::bail!("calibration.samples must be >= 1");
        }
        if !self.calibration.clean_air_ratio.is_finite() || self.calibration.clean_air_ratio <= 0.0
        {
            eyre::bail!("calibration.clean_air_ratio must be finite and > 0");
        }
        if !self.calibration.curve_a.is_finite() || self.calibration.curve_a == 0.0 {
            eyre::bail!("calibration.curve_a must be finite and non-zero");
        }
        if !self.calibration.curve_b.is_finite() {
            eyre::bail!("calibration.curve_b must be finite");
        }
        if let Some(r0) = self.calibration.r0
            && (!r0.is_finite() || r0 <= 0.0)
        {
            eyre::bail!("calibration.r0 must be finite and > 0 when set");
        }

        // Poll
        if self.poll.rate_hz == 0 {
            eyre::bail!("poll.rate_hz must be > 0");
        }

        Ok(())
    }
}
