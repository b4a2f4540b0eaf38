use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CoreError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(&'static str),
    #[error("timeout waiting for sensor")]
    Timeout,
    #[error("invalid state: {0}")]
    State(String),
}

/// Terminal faults. Unlike `CoreError`, a `FatalFault` is never retried:
/// the polling loop must stop and the surrounding program decides how to
/// report it. The wiring is assumed broken.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FatalFault {
    #[error("calibration baseline is zero; check sensor wiring")]
    BaselineZero,
    #[error("calibration baseline is not finite; check sensor wiring")]
    BaselineNotFinite,
    #[error("sensor failed during calibration: {0}")]
    CalibrationRead(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

// Map any boxed hardware error to a typed CoreError, downcasting the
// hardware crate's error type when the feature is enabled.
pub(crate) fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> CoreError {
    #[cfg(feature = "hardware-errors")]
    if let Some(hw) = e.downcast_ref::<sense_hardware::error::HwError>() {
        return match hw {
            sense_hardware::error::HwError::Timeout => CoreError::Timeout,
            other => CoreError::HardwareFault(other.to_string()),
        };
    }
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        CoreError::Timeout
    } else {
        CoreError::Hardware(s)
    }
}
