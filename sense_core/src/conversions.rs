//! Mappings from the TOML config schema into core types.

use crate::calib::CalibrationCfg;
use crate::faucet::FaucetCfg;
use crate::level::LevelBands;
use crate::monitor::MonitorCfg;
use std::time::Duration;

impl From<&sense_config::Faucet> for FaucetCfg {
    fn from(f: &sense_config::Faucet) -> Self {
        Self {
            threshold_cm: f.threshold_cm,
            valve_open: Duration::from_millis(f.valve_open_ms),
            status_interval: Duration::from_millis(f.status_interval_ms),
            echo_timeout: Duration::from_millis(f.echo_timeout_ms),
        }
    }
}

impl TryFrom<&sense_config::Gas> for LevelBands {
    type Error = eyre::Report;

    fn try_from(g: &sense_config::Gas) -> Result<Self, Self::Error> {
        LevelBands::new(g.low_ppm, g.high_ppm)
    }
}

impl From<&sense_config::Gas> for MonitorCfg {
    fn from(g: &sense_config::Gas) -> Self {
        Self {
            log_interval: Duration::from_millis(g.log_interval_ms),
            adc_full_scale: g.adc_full_scale,
            ..Self::default()
        }
    }
}

impl From<&sense_config::Calibration> for CalibrationCfg {
    fn from(c: &sense_config::Calibration) -> Self {
        Self {
            samples: c.samples,
            clean_air_ratio: c.clean_air_ratio,
            curve_a: c.curve_a,
            curve_b: c.curve_b,
        }
    }
}
