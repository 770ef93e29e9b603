//! Small math helpers shared across the DSP modules.

use libm::{expf, logf};

/// Convert decibels to linear gain.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Input is floored at 1e-10 to keep the logarithm finite for silence.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Hard clip to the ±threshold range.
///
/// The output stage uses this to bound the deliberately hot backfire
/// envelope instead of relying on platform clipping.
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_roundtrip() {
        for db in [-40.0_f32, -6.0, 0.0, 6.0, 20.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 0.01, "{db} dB -> {back} dB");
        }
    }

    #[test]
    fn unity_is_zero_db() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!(linear_to_db(1.0).abs() < 1e-4);
    }

    #[test]
    fn hard_clip_bounds() {
        assert_eq!(hard_clip(2.5, 1.0), 1.0);
        assert_eq!(hard_clip(-2.5, 1.0), -1.0);
        assert_eq!(hard_clip(0.3, 1.0), 0.3);
    }
}
