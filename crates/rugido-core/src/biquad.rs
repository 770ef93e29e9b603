//! Second-order IIR filter (RBJ cookbook).
//!
//! The exhaust coloration and intake filters are resonant low-passes; the
//! mechanical layer uses a high-pass. Both come from the standard RBJ
//! audio-EQ cookbook formulas over a Direct Form I structure.

use core::f32::consts::PI;
use libm::{cosf, sinf};

/// Direct Form I biquad.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Passthrough filter (`y[n] = x[n]`).
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            ..Self::default()
        }
    }

    /// Install coefficients, normalizing by `a0`.
    pub fn set_coefficients(&mut self, (b0, b1, b2, a0, a1, a2): (f32, f32, f32, f32, f32, f32)) {
        let inv = 1.0 / a0;
        self.b0 = b0 * inv;
        self.b1 = b1 * inv;
        self.b2 = b2 * inv;
        self.a1 = a1 * inv;
        self.a2 = a2 * inv;
    }

    /// Configure as a resonant low-pass.
    pub fn set_lowpass(&mut self, cutoff_hz: f32, q: f32, sample_rate: f32) {
        self.set_coefficients(lowpass_coefficients(cutoff_hz, q, sample_rate));
    }

    /// Configure as a high-pass.
    pub fn set_highpass(&mut self, cutoff_hz: f32, q: f32, sample_rate: f32) {
        self.set_coefficients(highpass_coefficients(cutoff_hz, q, sample_rate));
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }

    /// Clear the delay lines without touching coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// RBJ low-pass coefficients `(b0, b1, b2, a0, a1, a2)`.
///
/// Cutoff is clamped just below Nyquist to keep the filter stable when the
/// RPM-opened exhaust cutoff runs away at low sample rates.
pub fn lowpass_coefficients(
    cutoff_hz: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let limited = cutoff_hz.clamp(1.0, sample_rate * 0.49);
    let omega = 2.0 * PI * limited / sample_rate;
    let cos_w = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q.max(0.01));

    let b1 = 1.0 - cos_w;
    let b0 = b1 / 2.0;
    (b0, b1, b0, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
}

/// RBJ high-pass coefficients `(b0, b1, b2, a0, a1, a2)`.
pub fn highpass_coefficients(
    cutoff_hz: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let limited = cutoff_hz.clamp(1.0, sample_rate * 0.49);
    let omega = 2.0 * PI * limited / sample_rate;
    let cos_w = cosf(omega);
    let alpha = sinf(omega) / (2.0 * q.max(0.01));

    let b0 = (1.0 + cos_w) / 2.0;
    (b0, -(1.0 + cos_w), b0, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::sinf;

    fn rms_after_settle(filter: &mut Biquad, freq: f32, sample_rate: f32) -> f32 {
        let mut sum = 0.0f32;
        let n = 4800;
        for i in 0..n * 2 {
            let x = sinf(2.0 * PI * freq * i as f32 / sample_rate);
            let y = filter.process(x);
            if i >= n {
                sum += y * y;
            }
        }
        libm::sqrtf(sum / n as f32)
    }

    #[test]
    fn passthrough_by_default() {
        let mut f = Biquad::new();
        assert_eq!(f.process(0.5), 0.5);
        assert_eq!(f.process(-0.25), -0.25);
    }

    #[test]
    fn lowpass_attenuates_high_frequencies() {
        let mut f = Biquad::new();
        f.set_lowpass(600.0, 0.707, 48000.0);
        let low = rms_after_settle(&mut f, 100.0, 48000.0);
        f.clear();
        let high = rms_after_settle(&mut f, 8000.0, 48000.0);
        assert!(low > high * 10.0, "low {low} vs high {high}");
    }

    #[test]
    fn highpass_attenuates_low_frequencies() {
        let mut f = Biquad::new();
        f.set_highpass(2000.0, 0.707, 48000.0);
        let low = rms_after_settle(&mut f, 100.0, 48000.0);
        f.clear();
        let high = rms_after_settle(&mut f, 8000.0, 48000.0);
        assert!(high > low * 10.0, "high {high} vs low {low}");
    }

    #[test]
    fn resonant_lowpass_peaks_at_cutoff() {
        let mut f = Biquad::new();
        f.set_lowpass(1000.0, 8.0, 48000.0);
        let at_cutoff = rms_after_settle(&mut f, 1000.0, 48000.0);
        f.clear();
        let below = rms_after_settle(&mut f, 200.0, 48000.0);
        assert!(at_cutoff > below * 2.0, "{at_cutoff} vs {below}");
    }

    #[test]
    fn stable_with_cutoff_beyond_nyquist() {
        let mut f = Biquad::new();
        // rpm * 0.5 can push the exhaust cutoff past Nyquist; must clamp.
        f.set_lowpass(40000.0, 0.5, 48000.0);
        for i in 0..48000 {
            let y = f.process(sinf(i as f32 * 0.1));
            assert!(y.is_finite() && y.abs() < 10.0);
        }
    }

    #[test]
    fn clear_resets_state() {
        let mut f = Biquad::new();
        f.set_lowpass(500.0, 1.0, 48000.0);
        for _ in 0..100 {
            f.process(1.0);
        }
        f.clear();
        let y = f.process(0.0);
        assert_eq!(y, 0.0);
    }
}
