//! Peak envelope follower for the master-bus compressor.

use libm::expf;

/// Tracks signal amplitude with separate attack and release times.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeFollower {
    /// Create a follower with the given attack/release times in milliseconds.
    pub fn new(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        Self {
            envelope: 0.0,
            attack_coeff: coeff(attack_ms.max(0.1), sample_rate),
            release_coeff: coeff(release_ms.max(1.0), sample_rate),
        }
    }

    /// Process one sample; returns the rectified envelope level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let c = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = c * self.envelope + (1.0 - c) * level;
        self.envelope
    }

    /// Current envelope level.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

#[inline]
fn coeff(time_ms: f32, sample_rate: f32) -> f32 {
    expf(-1.0 / (time_ms * sample_rate / 1000.0))
}
