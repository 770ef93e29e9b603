//! Static transfer-function waveshaping ("grit").
//!
//! The combustion layer runs through a fixed soft-clipping curve rather
//! than a closed-form shaper: the curve is generated once, shared by
//! reference, and looked up with linear interpolation at process time.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::f32::consts::PI;

/// Number of points in the transfer curve.
pub const DISTORTION_CURVE_LEN: usize = 44100;

/// Compute the soft-clipping transfer curve for the given grit amount.
///
/// For index `i`, with `x = i*2/N - 1` mapping to [-1, 1):
///
/// ```text
/// curve[i] = (3 + amount) * x * 20 * (PI/180) / (PI + amount * |x|)
/// ```
///
/// The shape is a sigmoid-like odd function; larger `amount` pushes the
/// knee toward zero and adds saturation. Deterministic, pure.
pub fn distortion_curve(amount: f32) -> Arc<[f32]> {
    let n = DISTORTION_CURVE_LEN;
    let deg = PI / 180.0;
    let mut curve = Vec::with_capacity(n);
    for i in 0..n {
        let x = i as f32 * 2.0 / n as f32 - 1.0;
        curve.push((3.0 + amount) * x * 20.0 * deg / (PI + amount * x.abs()));
    }
    curve.into()
}

/// Applies a shared transfer curve with linear interpolation.
#[derive(Debug, Clone)]
pub struct Waveshaper {
    curve: Arc<[f32]>,
}

impl Waveshaper {
    /// Create a shaper over an existing curve.
    pub fn new(curve: Arc<[f32]>) -> Self {
        Self { curve }
    }

    /// Shape one sample. Input is clamped to [-1, 1] before lookup.
    #[inline]
    pub fn process(&self, input: f32) -> f32 {
        let n = self.curve.len();
        let pos = (input.clamp(-1.0, 1.0) + 1.0) * 0.5 * (n - 1) as f32;
        let idx = pos as usize;
        if idx >= n - 1 {
            return self.curve[n - 1];
        }
        let frac = pos - idx as f32;
        self.curve[idx] + (self.curve[idx + 1] - self.curve[idx]) * frac
    }

    /// The shared curve table.
    pub fn curve(&self) -> &Arc<[f32]> {
        &self.curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_has_fixed_length() {
        let curve = distortion_curve(100.0);
        assert_eq!(curve.len(), DISTORTION_CURVE_LEN);
    }

    #[test]
    fn curve_is_odd_symmetric_at_amount_100() {
        let curve = distortion_curve(100.0);
        let first = curve[0];
        let last = curve[DISTORTION_CURVE_LEN - 1];
        // x never quite reaches +1 (half-open interval), so allow the
        // one-index slack.
        assert!(
            (first + last).abs() < 1e-3,
            "curve[0]={first}, curve[N-1]={last}"
        );
    }

    #[test]
    fn curve_is_monotonic_nondecreasing() {
        let curve = distortion_curve(100.0);
        for w in curve.windows(2) {
            assert!(w[1] >= w[0] - 1e-7, "{} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn higher_amount_saturates_harder() {
        // More grit compresses the extremes toward the rails: the slope
        // near zero grows with amount.
        let soft = distortion_curve(10.0);
        let hard = distortion_curve(400.0);
        let mid = DISTORTION_CURVE_LEN / 2;
        let soft_slope = soft[mid + 50] - soft[mid];
        let hard_slope = hard[mid + 50] - hard[mid];
        assert!(hard_slope > soft_slope);
    }

    #[test]
    fn shaper_maps_zero_near_zero() {
        let shaper = Waveshaper::new(distortion_curve(100.0));
        assert!(shaper.process(0.0).abs() < 1e-3);
    }

    #[test]
    fn shaper_clamps_out_of_range_input() {
        let shaper = Waveshaper::new(distortion_curve(100.0));
        let max = shaper.process(1.0);
        assert_eq!(shaper.process(5.0), max);
        let min = shaper.process(-1.0);
        assert_eq!(shaper.process(-5.0), min);
    }

    #[test]
    fn shaper_interpolates_monotonically() {
        let shaper = Waveshaper::new(distortion_curve(100.0));
        let mut prev = shaper.process(-1.0);
        let mut x = -1.0f32;
        while x <= 1.0 {
            let y = shaper.process(x);
            assert!(y >= prev - 1e-6);
            prev = y;
            x += 0.01;
        }
    }
}
