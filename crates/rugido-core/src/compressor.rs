//! Feed-forward soft-knee compressor.
//!
//! The master bus runs every layer through heavy compression so the
//! independently-automated layers read as one recorded source rather than
//! a stack of synthesizers. No makeup stage: the exhaust gain factor
//! already controls perceived loudness upstream.

use crate::envelope::EnvelopeFollower;
use crate::math::{db_to_linear, linear_to_db};

/// Dynamics compressor with a fixed configuration chosen at construction.
#[derive(Debug, Clone)]
pub struct Compressor {
    follower: EnvelopeFollower,
    threshold_db: f32,
    knee_db: f32,
    /// `1 - 1/ratio`, precomputed.
    slope: f32,
}

impl Compressor {
    /// Create a compressor.
    ///
    /// `ratio` is the compression ratio (12.0 means 12:1), clamped to at
    /// least 1.0.
    pub fn new(
        sample_rate: f32,
        threshold_db: f32,
        knee_db: f32,
        ratio: f32,
        attack_ms: f32,
        release_ms: f32,
    ) -> Self {
        Self {
            follower: EnvelopeFollower::new(sample_rate, attack_ms, release_ms),
            threshold_db,
            knee_db: knee_db.max(0.0),
            slope: 1.0 - 1.0 / ratio.max(1.0),
        }
    }

    /// Compress one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let envelope_db = linear_to_db(self.follower.process(input));
        input * db_to_linear(self.gain_reduction_db(envelope_db))
    }

    /// Gain reduction in dB (non-positive) for a detector level in dB.
    #[inline]
    fn gain_reduction_db(&self, level_db: f32) -> f32 {
        let overshoot = level_db - self.threshold_db;
        let half_knee = self.knee_db / 2.0;
        if overshoot <= -half_knee {
            0.0
        } else if overshoot > half_knee {
            -(overshoot * self.slope)
        } else {
            // Quadratic interpolation through the knee.
            let edge = overshoot + half_knee;
            -(self.slope * edge * edge / (2.0 * self.knee_db))
        }
    }

    /// Clear detector history.
    pub fn reset(&mut self) {
        self.follower.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master_bus_compressor() -> Compressor {
        Compressor::new(48000.0, -20.0, 10.0, 12.0, 5.0, 100.0)
    }

    #[test]
    fn output_stays_finite() {
        let mut comp = master_bus_compressor();
        for i in 0..2000 {
            let x = libm::sinf(i as f32 * 0.05);
            assert!(comp.process(x).is_finite());
        }
    }

    #[test]
    fn loud_signal_is_reduced() {
        let mut comp = master_bus_compressor();
        let mut out = 0.0;
        for _ in 0..5000 {
            out = comp.process(0.9);
        }
        // 0.9 is ~ -0.9 dBFS, about 19 dB over threshold at 12:1.
        assert!(out < 0.3, "expected heavy reduction, got {out}");
    }

    #[test]
    fn quiet_signal_passes_untouched() {
        let mut comp = master_bus_compressor();
        let mut out = 0.0;
        for _ in 0..5000 {
            out = comp.process(0.05); // ~-26 dBFS, under the knee
        }
        assert!((out - 0.05).abs() < 0.005, "got {out}");
    }

    #[test]
    fn reduction_grows_with_level() {
        let mut a = master_bus_compressor();
        let mut b = master_bus_compressor();
        let (mut ga, mut gb) = (0.0, 0.0);
        for _ in 0..5000 {
            ga = a.process(0.3) / 0.3;
            gb = b.process(0.9) / 0.9;
        }
        assert!(gb < ga, "gain at 0.9 ({gb}) should be below gain at 0.3 ({ga})");
    }
}
