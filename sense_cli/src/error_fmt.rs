//! Human-readable error descriptions for operator-facing failures.

use sense_core::error::{CoreError, FatalFault};
use std::error::Error as _;

/// Map an eyre::Report to an explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(fault) = err.downcast_ref::<FatalFault>() {
        return match fault {
            FatalFault::BaselineZero => {
                "What happened: Calibration produced a zero baseline, so the gas sensor is reading nothing at all.\nLikely causes: Sensing element disconnected, shorted analog input, or no power to the sensor heater.\nHow to fix: Check the sensor wiring and supply, then restart. The monitor refuses to run on a zero baseline.".to_string()
            }
            FatalFault::BaselineNotFinite => {
                "What happened: Calibration produced a non-finite baseline (open circuit reading).\nLikely causes: Floating analog input or a broken sensing element.\nHow to fix: Check the sensor wiring, then restart. The monitor refuses to run on an untrustworthy baseline.".to_string()
            }
            FatalFault::CalibrationRead(msg) => format!(
                "What happened: The gas sensor failed while calibrating ({msg}).\nLikely causes: Sensor not powered or the ADC backend is unavailable.\nHow to fix: Verify the sensor and ADC wiring, then restart."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<CoreError>() {
        if matches!(ce, CoreError::Timeout) {
            return "What happened: A sensor read timed out.\nLikely causes: Probe not wired correctly or the echo timeout is too low.\nHow to fix: Verify trig/echo wiring and consider raising faucet.echo_timeout_ms in the config.".to_string();
        }
        if let CoreError::Config(msg) = ce {
            return format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or CLI overrides.\nHow to fix: Edit the config file or the override flags, then rerun."
            );
        }
        return format!(
            "What happened: {ce}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("gpio") {
        return "What happened: Failed to initialize hardware pins.\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process may access GPIO.".to_string();
    }

    if lower.contains("must be") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nHow to fix: Edit the TOML config or override flags and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Exit code policy: the fatal calibration halt is distinguishable from
/// ordinary failures so supervisors do not blindly restart into it.
pub fn exit_code(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<FatalFault>().is_some() {
        2
    } else {
        1
    }
}
