//! One-shot clean-air calibration and the concentration regression curve.

use crate::error::FatalFault;
use sense_traits::AnalogSensor;

/// MQ-2 sensing resistance ratio (Rs/R0) in clean air.
pub const CLEAN_AIR_RATIO: f32 = 9.83;
/// LPG regression coefficients for the MQ-2 curve: ppm = a * (Rs/R0)^b.
pub const LPG_CURVE_A: f32 = 574.25;
pub const LPG_CURVE_B: f32 = -2.222;

#[derive(Debug, Clone, Copy)]
pub struct CalibrationCfg {
    /// Number of samples averaged into the baseline.
    pub samples: u32,
    /// Known Rs/R0 ratio in clean air for this sensor family.
    pub clean_air_ratio: f32,
    /// Regression coefficients applied on top of the baseline.
    pub curve_a: f32,
    pub curve_b: f32,
}

impl Default for CalibrationCfg {
    fn default() -> Self {
        Self {
            samples: 10,
            clean_air_ratio: CLEAN_AIR_RATIO,
            curve_a: LPG_CURVE_A,
            curve_b: LPG_CURVE_B,
        }
    }
}

/// Validated clean-air baseline (R0). Constructed only by a successful
/// calibration run or by re-validating a persisted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    r0: f32,
}

impl Baseline {
    /// Accept a previously persisted baseline, re-applying the validity gate.
    pub fn from_persisted(r0: f32) -> Result<Self, FatalFault> {
        if !r0.is_finite() {
            return Err(FatalFault::BaselineNotFinite);
        }
        if r0 == 0.0 {
            return Err(FatalFault::BaselineZero);
        }
        Ok(Self { r0 })
    }

    pub fn r0(&self) -> f32 {
        self.r0
    }
}

/// Sample the sensor `cfg.samples` times and average the derived clean-air
/// baseline contributions (Rs / clean-air ratio).
///
/// The accumulated value being zero or non-finite means the sensor is not
/// actually connected (shorted or floating input): the fault is terminal
/// and the caller must stop polling entirely instead of operating on an
/// untrustworthy baseline.
pub fn calibrate(
    sensor: &mut dyn AnalogSensor,
    cfg: &CalibrationCfg,
) -> Result<Baseline, FatalFault> {
    let samples = cfg.samples.max(1);
    let mut acc = 0.0f32;
    for sample in 1..=samples {
        let rs = sensor
            .read_raw()
            .map_err(|e| FatalFault::CalibrationRead(e.to_string()))?;
        acc += rs / cfg.clean_air_ratio;
        tracing::trace!(sample, rs, "calibration sample");
    }
    if !acc.is_finite() {
        return Err(FatalFault::BaselineNotFinite);
    }
    if acc == 0.0 {
        return Err(FatalFault::BaselineZero);
    }
    let r0 = acc / samples as f32;
    tracing::info!(r0, samples, "calibration complete");
    Ok(Baseline { r0 })
}

/// Concentration regression over the baseline: ppm = a * (Rs/R0)^b.
#[derive(Debug, Clone, Copy)]
pub struct GasCurve {
    a: f32,
    b: f32,
    r0: f32,
}

impl GasCurve {
    pub fn new(a: f32, b: f32, baseline: Baseline) -> Self {
        Self {
            a,
            b,
            r0: baseline.r0(),
        }
    }

    /// LPG curve with the stock MQ-2 coefficients.
    pub fn lpg(baseline: Baseline) -> Self {
        Self::new(LPG_CURVE_A, LPG_CURVE_B, baseline)
    }

    pub fn ppm(&self, rs: f32) -> f32 {
        self.a * (rs / self.r0).powf(self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_is_monotonic_decreasing_for_negative_exponent() {
        let baseline = Baseline::from_persisted(100.0).unwrap();
        let curve = GasCurve::lpg(baseline);
        assert!(curve.ppm(50.0) > curve.ppm(100.0));
        assert!(curve.ppm(100.0) > curve.ppm(200.0));
    }

    #[test]
    fn persisted_baseline_is_gated() {
        assert_eq!(
            Baseline::from_persisted(0.0),
            Err(FatalFault::BaselineZero)
        );
        assert_eq!(
            Baseline::from_persisted(f32::INFINITY),
            Err(FatalFault::BaselineNotFinite)
        );
        assert!(Baseline::from_persisted(42.0).is_ok());
    }
}
