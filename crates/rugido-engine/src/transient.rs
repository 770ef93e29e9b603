//! One-shot percussive events: backfire pops and gear-shift clicks.
//!
//! Transients are mixed in after the compressor so a pop keeps its crack
//! even when the sustained layers are being squashed.

use rugido_core::{AutomatedParam, Biquad, Oscillator, Waveform};

/// Upper bound on simultaneously sounding one-shots. Spawning past the
/// cap evicts the oldest, which by then is inaudibly quiet anyway.
const MAX_ACTIVE: usize = 8;

pub(crate) struct Transient {
    osc: Oscillator,
    freq: AutomatedParam,
    gain: AutomatedParam,
    filter: Option<Biquad>,
    remaining: u32,
}

impl Transient {
    /// Exhaust backfire: a sawtooth dropping 100 Hz to 10 Hz over 100 ms,
    /// gain collapsing from 2.0, muffled by a 2 kHz low-pass.
    pub(crate) fn backfire(sample_rate: f32) -> Self {
        const DURATION: f32 = 0.1;
        let mut freq = AutomatedParam::new(100.0, sample_rate);
        freq.ramp_exp(10.0, DURATION);
        let mut gain = AutomatedParam::new(2.0, sample_rate);
        gain.ramp_exp(0.01, DURATION);
        let mut filter = Biquad::new();
        filter.set_lowpass(2000.0, core::f32::consts::FRAC_1_SQRT_2, sample_rate);
        Self {
            osc: Oscillator::new(sample_rate, Waveform::Saw),
            freq,
            gain,
            filter: Some(filter),
            remaining: duration_samples(DURATION, sample_rate),
        }
    }

    /// Gearbox click: a quieter, shorter square chirp, 400 Hz down to 100 Hz.
    pub(crate) fn shift(sample_rate: f32) -> Self {
        const DURATION: f32 = 0.08;
        let mut freq = AutomatedParam::new(400.0, sample_rate);
        freq.ramp_exp(100.0, DURATION);
        let mut gain = AutomatedParam::new(0.5, sample_rate);
        gain.ramp_exp(0.01, DURATION);
        Self {
            osc: Oscillator::new(sample_rate, Waveform::Square),
            freq,
            gain,
            filter: None,
            remaining: duration_samples(DURATION, sample_rate),
        }
    }

    fn process(&mut self) -> f32 {
        self.osc.set_frequency(self.freq.advance());
        let mut s = self.osc.advance() * self.gain.advance();
        if let Some(filter) = &mut self.filter {
            s = filter.process(s);
        }
        self.remaining = self.remaining.saturating_sub(1);
        s
    }

    fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

fn duration_samples(seconds: f32, sample_rate: f32) -> u32 {
    (seconds * sample_rate).round() as u32
}

/// All currently sounding one-shots.
#[derive(Default)]
pub(crate) struct TransientPool {
    active: Vec<Transient>,
}

impl TransientPool {
    pub(crate) fn spawn(&mut self, transient: Transient) {
        if self.active.len() == MAX_ACTIVE {
            self.active.remove(0);
        }
        self.active.push(transient);
    }

    /// Sum of all active one-shots for this sample. Finished ones are
    /// dropped on the way out.
    pub(crate) fn process(&mut self) -> f32 {
        let mut sum = 0.0;
        for t in &mut self.active {
            sum += t.process();
        }
        self.active.retain(|t| !t.is_finished());
        sum
    }

    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn clear(&mut self) {
        self.active.clear();
    }
}
