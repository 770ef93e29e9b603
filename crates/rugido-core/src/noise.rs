//! Shared noise buffers and looping playback.
//!
//! The intake and mechanical layers play looped noise rather than running a
//! PRNG per sample: the buffers are generated once per engine lifetime and
//! shared by reference across every start/stop cycle. The loop seam after
//! two seconds is audible in principle but buried under the moving filters;
//! perfect loop continuity is an accepted non-goal.

use alloc::sync::Arc;
use alloc::vec::Vec;

/// Noise buffer duration in seconds.
pub const NOISE_SECONDS: u32 = 2;

/// Xorshift32 PRNG.
///
/// Deterministic and cheap; also reused by callers that need a light
/// uniform source (the ride simulator's jitter and backfire dice).
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator from a nonzero seed (zero is remapped).
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9e3779b9 } else { seed },
        }
    }

    /// Next raw 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform sample in [-1, 1].
    #[inline]
    pub fn next_bipolar(&mut self) -> f32 {
        (self.next_u32() as i32 as f32) / (i32::MAX as f32)
    }

    /// Uniform sample in [0, 1).
    #[inline]
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Immutable white and pink noise buffers, two seconds each.
///
/// Cloning is cheap (Arc); the engine clones per layer build and keeps one
/// instance for the engine lifetime so repeated starts never reallocate.
#[derive(Debug, Clone)]
pub struct NoiseBank {
    /// Uniform white noise in [-1, 1].
    pub white: Arc<[f32]>,
    /// Paul Kellet refined pink noise approximation.
    pub pink: Arc<[f32]>,
}

impl NoiseBank {
    /// Generate both buffers for the given sample rate.
    pub fn generate(sample_rate: u32) -> Self {
        let len = (sample_rate * NOISE_SECONDS) as usize;
        let mut rng = XorShift32::new(0x5eed_0001);

        let mut white = Vec::with_capacity(len);
        for _ in 0..len {
            white.push(rng.next_bipolar());
        }

        // Kellet's 7-state IIR pinking filter driven by fresh white noise.
        let mut pink = Vec::with_capacity(len);
        let (mut b0, mut b1, mut b2, mut b3, mut b4, mut b5, mut b6) =
            (0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for _ in 0..len {
            let w = rng.next_bipolar();
            b0 = 0.99886 * b0 + w * 0.0555179;
            b1 = 0.99332 * b1 + w * 0.0750759;
            b2 = 0.96900 * b2 + w * 0.1538520;
            b3 = 0.86650 * b3 + w * 0.3104856;
            b4 = 0.55000 * b4 + w * 0.5329522;
            b5 = -0.7616 * b5 - w * 0.0168981;
            pink.push((b0 + b1 + b2 + b3 + b4 + b5 + b6 + w * 0.5362) * 0.11);
            b6 = w * 0.115926;
        }

        Self {
            white: white.into(),
            pink: pink.into(),
        }
    }
}

/// Loops one shared noise buffer.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    buffer: Arc<[f32]>,
    position: usize,
}

impl NoiseSource {
    /// Create a looping source over `buffer`.
    pub fn new(buffer: Arc<[f32]>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Next sample, wrapping at the buffer end.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let s = self.buffer[self.position];
        self.position += 1;
        if self.position == self.buffer.len() {
            self.position = 0;
        }
        s
    }

    /// The underlying shared buffer.
    pub fn buffer(&self) -> &Arc<[f32]> {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    /// DFT magnitude at one bin via Goertzel; O(N) per bin, no FFT needed.
    fn goertzel_magnitude(signal: &[f32], bin: usize) -> f32 {
        let n = signal.len();
        let omega = 2.0 * PI * bin as f32 / n as f32;
        let coeff = 2.0 * libm::cosf(omega);
        let (mut s0, mut s1): (f64, f64) = (0.0, 0.0);
        for &x in signal {
            let s2 = s1;
            s1 = s0;
            s0 = f64::from(x) + f64::from(coeff) * s1 - s2;
        }
        let real = s0 - s1 * f64::from(libm::cosf(omega));
        let imag = s1 * f64::from(libm::sinf(omega));
        libm::sqrt(real * real + imag * imag) as f32
    }

    fn band_energy(signal: &[f32], bins: core::ops::Range<usize>, step: usize) -> f32 {
        bins.step_by(step)
            .map(|b| {
                let m = goertzel_magnitude(signal, b);
                m * m
            })
            .sum()
    }

    #[test]
    fn buffers_are_two_seconds() {
        for sr in [22050u32, 44100, 48000] {
            let bank = NoiseBank::generate(sr);
            assert_eq!(bank.white.len(), (sr * 2) as usize);
            assert_eq!(bank.pink.len(), (sr * 2) as usize);
        }
    }

    #[test]
    fn white_noise_in_range() {
        let bank = NoiseBank::generate(44100);
        for &s in bank.white.iter() {
            assert!((-1.0..=1.0).contains(&s), "white sample {s}");
        }
    }

    #[test]
    fn pink_noise_within_overshoot_tolerance() {
        // Filter summation can overshoot unity slightly; 1.2 is the
        // accepted bound.
        let bank = NoiseBank::generate(44100);
        for &s in bank.pink.iter() {
            assert!(s.abs() <= 1.2, "pink sample {s}");
        }
    }

    #[test]
    fn pink_energy_concentrates_low() {
        let bank = NoiseBank::generate(8000);
        let pink = &bank.pink[..8000];
        let white = &bank.white[..8000];

        // Low band 20..400 Hz vs high band 2k..3.8k Hz, 20 bins each.
        let pink_low = band_energy(pink, 20..400, 19);
        let pink_high = band_energy(pink, 2000..3800, 90);
        let white_low = band_energy(white, 20..400, 19);
        let white_high = band_energy(white, 2000..3800, 90);

        let pink_ratio = pink_low / pink_high.max(1e-12);
        let white_ratio = white_low / white_high.max(1e-12);
        assert!(
            pink_ratio > white_ratio * 4.0,
            "pink low/high {pink_ratio} should far exceed white's {white_ratio}"
        );
    }

    #[test]
    fn source_loops_seamlessly_in_index() {
        let bank = NoiseBank::generate(22050);
        let len = bank.white.len();
        let mut src = NoiseSource::new(bank.white.clone());
        let first = src.advance();
        for _ in 1..len {
            src.advance();
        }
        // One full pass later we are back at sample zero.
        assert_eq!(src.advance(), first);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = NoiseBank::generate(22050);
        let b = NoiseBank::generate(22050);
        assert_eq!(a.white[..100], b.white[..100]);
        assert_eq!(a.pink[..100], b.pink[..100]);
    }

    #[test]
    fn xorshift_unit_range() {
        let mut rng = XorShift32::new(7);
        for _ in 0..10000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
