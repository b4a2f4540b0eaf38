//! Common time/scale helpers for sense_core.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;
/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Compute the period in microseconds for a given polling rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Compute the period in milliseconds for a given polling rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 millisecond.
#[inline]
pub fn period_ms(hz: u32) -> u64 {
    (MILLIS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Map a raw ADC reading onto 0..=100 of the converter's full scale.
/// Non-finite inputs and degenerate scales map to 0.
#[inline]
pub fn percent_of_scale(raw: f32, full_scale: f32) -> u8 {
    if !raw.is_finite() || !full_scale.is_finite() || full_scale <= 0.0 {
        return 0;
    }
    (raw / full_scale * 100.0).clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_clamps_degenerate_rates() {
        assert_eq!(period_us(0), MICROS_PER_SEC);
        assert_eq!(period_us(20), 50_000);
        assert_eq!(period_ms(0), MILLIS_PER_SEC);
        assert_eq!(period_ms(50), 20);
    }

    #[test]
    fn percent_clamps_and_rejects_non_finite() {
        assert_eq!(percent_of_scale(0.0, 4095.0), 0);
        assert_eq!(percent_of_scale(4095.0, 4095.0), 100);
        assert_eq!(percent_of_scale(2047.5, 4095.0), 50);
        assert_eq!(percent_of_scale(9999.0, 4095.0), 100);
        assert_eq!(percent_of_scale(f32::NAN, 4095.0), 0);
        assert_eq!(percent_of_scale(100.0, 0.0), 0);
    }
}
