//! Property-based tests for rugido-core DSP primitives.
//!
//! Filter stability, automation convergence, and transfer-curve shape under
//! randomized parameters.

use proptest::prelude::*;
use rugido_core::{
    AutomatedParam, Biquad, Oscillator, Waveform, Waveshaper, distortion_curve,
    highpass_coefficients, lowpass_coefficients,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// For any cutoff (even absurd ones the RPM law can produce) and Q,
    /// both filter variants stay finite over random input.
    #[test]
    fn biquad_stability(
        freq in 20.0f32..60000.0f32,
        q in 0.1f32..10.0f32,
        highpass in any::<bool>(),
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut filter = Biquad::new();
        let coeffs = if highpass {
            highpass_coefficients(freq, q, 48000.0)
        } else {
            lowpass_coefficients(freq, q, 48000.0)
        };
        filter.set_coefficients(coeffs);

        for &sample in &input {
            let out = filter.process(sample);
            prop_assert!(
                out.is_finite(),
                "filter (freq={freq}, q={q}, highpass={highpass}) produced {out}"
            );
        }
    }

    /// Exponential automation always converges toward its target.
    #[test]
    fn automation_converges(
        initial in -10.0f32..10.0f32,
        target in -10.0f32..10.0f32,
        tau in 0.01f32..0.2f32,
    ) {
        let mut param = AutomatedParam::new(initial, 48000.0);
        param.set_target(target, tau);

        // Ten time constants leaves < 0.005% of the distance.
        for _ in 0..(tau * 48000.0 * 10.0) as usize {
            param.advance();
        }
        let distance = (param.value() - target).abs();
        let span = (target - initial).abs().max(1e-3);
        prop_assert!(
            distance < span * 0.01 + 1e-4,
            "value {} never reached target {target}",
            param.value()
        );
    }

    /// Linear ramps land exactly on the target.
    #[test]
    fn linear_ramp_exact(
        initial in -2.0f32..2.0f32,
        target in -2.0f32..2.0f32,
        duration in 0.01f32..0.6f32,
    ) {
        let mut param = AutomatedParam::new(initial, 48000.0);
        param.ramp_linear(target, duration);
        for _ in 0..(duration * 48000.0) as usize + 1 {
            param.advance();
        }
        prop_assert_eq!(param.value(), target);
    }

    /// The distortion curve is odd-symmetric-ish and monotonic for any
    /// positive grit amount, and the shaper output is bounded by the curve
    /// endpoints.
    #[test]
    fn curve_shape_holds(amount in 1.0f32..500.0f32, x in -1.5f32..1.5f32) {
        let curve = distortion_curve(amount);
        prop_assert!(curve.windows(2).all(|w| w[1] >= w[0] - 1e-6));

        let shaper = Waveshaper::new(curve.clone());
        let y = shaper.process(x);
        prop_assert!(y >= curve[0] - 1e-6 && y <= curve[curve.len() - 1] + 1e-6);
    }

    /// Oscillators remain bounded at any audible frequency.
    #[test]
    fn oscillator_bounded(
        freq in 10.0f32..12000.0f32,
        variant in 0usize..4,
    ) {
        let waveform = match variant {
            0 => Waveform::Sine,
            1 => Waveform::Triangle,
            2 => Waveform::Saw,
            _ => Waveform::Square,
        };
        let mut osc = Oscillator::new(48000.0, waveform);
        osc.set_frequency(freq);
        for _ in 0..2048 {
            let s = osc.advance();
            prop_assert!(s.is_finite() && s.abs() <= 2.5, "{waveform:?}@{freq} -> {s}");
        }
    }
}
