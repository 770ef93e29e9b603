//! Band-limited periodic sources for the combustion layer.
//!
//! A motorcycle's tonal content comes from saw/square/triangle harmonics, so
//! the naive shapes are corrected with PolyBLEP at their discontinuities to
//! keep aliasing out of the high band where the mechanical layer lives.

use core::f32::consts::PI;
use libm::sinf;

/// Waveform shapes the engine selects from per engine kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// Pure fundamental.
    #[default]
    Sine,
    /// Odd harmonics, soft. The sub voice of single-cylinder machines.
    Triangle,
    /// Full harmonic series, bright.
    Saw,
    /// Odd harmonics, hollow.
    Square,
}

/// Audio-rate oscillator with PolyBLEP anti-aliasing.
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Phase accumulator in [0, 1).
    phase: f32,
    /// Phase increment per sample.
    phase_inc: f32,
    sample_rate: f32,
    frequency: f32,
    waveform: Waveform,
    /// Leaky-integrator state for the triangle.
    integrator: f32,
}

impl Oscillator {
    /// Create an oscillator at the given sample rate and waveform.
    ///
    /// Starts at 0 Hz; the engine retunes it on the first update tick.
    pub fn new(sample_rate: f32, waveform: Waveform) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate,
            frequency: 0.0,
            waveform,
            integrator: 0.0,
        }
    }

    /// Set frequency in Hz. Negative values clamp to 0 (DC hold).
    #[inline]
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// The configured waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Generate the next sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let dt = self.phase_inc;
        let out = match self.waveform {
            Waveform::Sine => sinf(self.phase * 2.0 * PI),
            Waveform::Saw => 2.0 * self.phase - 1.0 - poly_blep(self.phase, dt),
            Waveform::Square => self.blep_square(dt),
            Waveform::Triangle => {
                // Integrate a BLEP square; better behaved than correcting
                // the triangle's slope discontinuity directly.
                let square = self.blep_square(dt);
                let leak = 1.0 - (self.frequency / self.sample_rate).min(0.1);
                self.integrator = leak * self.integrator + square * dt * 4.0;
                self.integrator
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    #[inline]
    fn blep_square(&self, dt: f32) -> f32 {
        let naive = if self.phase < 0.5 { 1.0 } else { -1.0 };
        let wrapped = if self.phase >= 0.5 {
            self.phase - 0.5
        } else {
            self.phase + 0.5
        };
        naive + poly_blep(self.phase, dt) - poly_blep(wrapped, dt)
    }
}

/// 2nd-order PolyBLEP residual for a unit step at phase 0.
///
/// Spans one sample on each side of the discontinuity; roughly 30 dB of
/// alias suppression, plenty for tones that sit under two noise layers and
/// a low-pass exhaust filter.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let n = t / dt;
        n + n - n * n - 1.0
    } else if t > 1.0 - dt {
        let n = (t - 1.0) / dt;
        n * n + n + n + 1.0
    } else {
        0.0
    }
}
