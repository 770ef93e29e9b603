//! Node parameter automation.
//!
//! Every tunable value in the signal graph (oscillator frequency, filter
//! cutoff, layer gain) is an [`AutomatedParam`]: a scalar that moves toward
//! scheduled targets sample-by-sample instead of stepping, so control-rate
//! updates from the driving loop never produce zipper noise or clicks.
//!
//! Three transition shapes are supported, mirroring what the engine
//! actually schedules:
//!
//! - **Exponential approach** ([`set_target`](AutomatedParam::set_target)):
//!   one-pole RC response with a time constant in seconds. Used for all
//!   continuous retuning (frequency, cutoff, gain).
//! - **Linear ramp** ([`ramp_linear`](AutomatedParam::ramp_linear)):
//!   constant-rate transition over a fixed duration. Used for the master
//!   fade-in.
//! - **Geometric ramp** ([`ramp_exp`](AutomatedParam::ramp_exp)):
//!   exponential interpolation between two positive values over a fixed
//!   duration. Used for transient pitch sweeps and decay envelopes.

use libm::{expf, powf};

/// Smallest magnitude a geometric ramp endpoint may have.
///
/// A geometric ramp between values of opposite sign (or through zero) is
/// undefined, so endpoints are floored here.
const EXP_RAMP_FLOOR: f32 = 1e-4;

#[derive(Debug, Clone, Copy)]
enum Segment {
    /// Settled at the target.
    Hold,
    /// One-pole approach: `y += coeff * (target - y)` per sample.
    Exponential { coeff: f32 },
    /// Fixed-length additive ramp.
    Linear { increment: f32, remaining: u32 },
    /// Fixed-length multiplicative ramp.
    Geometric { factor: f32, remaining: u32 },
}

/// A parameter with scheduled, sample-accurate transitions.
#[derive(Debug, Clone)]
pub struct AutomatedParam {
    current: f32,
    target: f32,
    sample_rate: f32,
    segment: Segment,
}

impl AutomatedParam {
    /// Create a parameter holding `initial` at the given sample rate.
    pub fn new(initial: f32, sample_rate: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            sample_rate,
            segment: Segment::Hold,
        }
    }

    /// Schedule an exponential approach toward `target`.
    ///
    /// `time_constant` is the RC time constant in seconds: the parameter
    /// covers ~63% of the remaining distance per time constant and is
    /// effectively settled after five. A non-positive time constant snaps.
    pub fn set_target(&mut self, target: f32, time_constant: f32) {
        self.target = target;
        if time_constant <= 0.0 || self.sample_rate <= 0.0 {
            self.current = target;
            self.segment = Segment::Hold;
        } else {
            let samples = time_constant * self.sample_rate;
            self.segment = Segment::Exponential {
                coeff: 1.0 - expf(-1.0 / samples),
            };
        }
    }

    /// Schedule a constant-rate ramp reaching `target` after `duration` seconds.
    pub fn ramp_linear(&mut self, target: f32, duration: f32) {
        self.target = target;
        let samples = (duration * self.sample_rate) as u32;
        if samples == 0 {
            self.current = target;
            self.segment = Segment::Hold;
        } else {
            self.segment = Segment::Linear {
                increment: (target - self.current) / samples as f32,
                remaining: samples,
            };
        }
    }

    /// Schedule a geometric ramp reaching `target` after `duration` seconds.
    ///
    /// Both the current value and the target must be nonzero and share a
    /// sign; magnitudes below 1e-4 are floored. This matches the usual
    /// audio-API exponential-ramp contract and is what gives transient
    /// envelopes their natural decay.
    pub fn ramp_exp(&mut self, target: f32, duration: f32) {
        let sign = if self.current < 0.0 { -1.0 } else { 1.0 };
        let from = self.current.abs().max(EXP_RAMP_FLOOR);
        let to = target.abs().max(EXP_RAMP_FLOOR);
        self.current = sign * from;
        self.target = sign * to;

        let samples = (duration * self.sample_rate) as u32;
        if samples == 0 {
            self.current = self.target;
            self.segment = Segment::Hold;
        } else {
            self.segment = Segment::Geometric {
                factor: powf(to / from, 1.0 / samples as f32),
                remaining: samples,
            };
        }
    }

    /// Set the value immediately, cancelling any scheduled transition.
    pub fn set_now(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.segment = Segment::Hold;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match &mut self.segment {
            Segment::Hold => {}
            Segment::Exponential { coeff } => {
                let next = self.current + *coeff * (self.target - self.current);
                if next == self.current {
                    // The per-sample step has fallen below one ulp of the
                    // value and further iterations cannot move it. Land on
                    // the target exactly, like the fixed-length ramps do.
                    self.current = self.target;
                    self.segment = Segment::Hold;
                } else {
                    self.current = next;
                }
            }
            Segment::Linear {
                increment,
                remaining,
            } => {
                self.current += *increment;
                *remaining -= 1;
                if *remaining == 0 {
                    self.current = self.target;
                    self.segment = Segment::Hold;
                }
            }
            Segment::Geometric { factor, remaining } => {
                self.current *= *factor;
                *remaining -= 1;
                if *remaining == 0 {
                    self.current = self.target;
                    self.segment = Segment::Hold;
                }
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }

    /// The value this parameter is heading toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the parameter has effectively reached its target.
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }
}
