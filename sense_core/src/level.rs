//! Threshold classification of a continuous gas concentration reading.

use crate::error::{CoreError, Result};

/// Discrete severity of a concentration reading, ordered from safe to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GasLevel {
    Safe,
    Moderate,
    Critical,
}

impl GasLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GasLevel::Safe => "SAFE",
            GasLevel::Moderate => "MODERATE",
            GasLevel::Critical => "CRITICAL",
        }
    }
}

/// Two-breakpoint band classifier.
///
/// Intervals are closed-open: a reading exactly at a breakpoint belongs to
/// the upper bracket. Non-finite readings fall through both comparisons and
/// classify as `Critical`.
#[derive(Debug, Clone, Copy)]
pub struct LevelBands {
    low_ppm: f32,
    high_ppm: f32,
}

impl Default for LevelBands {
    fn default() -> Self {
        Self {
            low_ppm: 200.0,
            high_ppm: 500.0,
        }
    }
}

impl LevelBands {
    pub fn new(low_ppm: f32, high_ppm: f32) -> Result<Self> {
        if !low_ppm.is_finite() || !high_ppm.is_finite() {
            return Err(eyre::Report::new(CoreError::Config(
                "level breakpoints must be finite",
            )));
        }
        if low_ppm <= 0.0 {
            return Err(eyre::Report::new(CoreError::Config(
                "low breakpoint must be > 0",
            )));
        }
        if low_ppm >= high_ppm {
            return Err(eyre::Report::new(CoreError::Config(
                "low breakpoint must be below high breakpoint",
            )));
        }
        Ok(Self { low_ppm, high_ppm })
    }

    pub fn classify(&self, ppm: f32) -> GasLevel {
        if ppm < self.low_ppm {
            GasLevel::Safe
        } else if ppm < self.high_ppm {
            GasLevel::Moderate
        } else {
            GasLevel::Critical
        }
    }

    pub fn low_ppm(&self) -> f32 {
        self.low_ppm
    }

    pub fn high_ppm(&self) -> f32 {
        self.high_ppm
    }
}
