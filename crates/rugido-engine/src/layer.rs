//! The three synthesis layers and the shared exhaust coloration stage.
//!
//! Combustion (three oscillators into a waveshaper into the exhaust
//! low-pass), intake (pink noise through a resonant low-pass) and
//! mechanical (white noise through a fixed high-pass) run in parallel
//! and are summed before the master gain.

use std::sync::Arc;

use rugido_core::{AutomatedParam, Biquad, NoiseBank, NoiseSource, Oscillator, Waveshaper};

use crate::types::EngineKind;

/// Filter coefficients are rebuilt every this many samples. Cutoff params
/// still advance per sample, so sweeps stay smooth at any musical rate.
const CONTROL_INTERVAL: u32 = 32;

/// Smoothing time constant for oscillator frequency targets.
pub(crate) const FREQ_TAU: f32 = 0.05;
/// Smoothing time constant for gain and filter cutoff targets.
pub(crate) const GAIN_TAU: f32 = 0.1;

pub(crate) struct CombustionLayer {
    primary: Oscillator,
    secondary: Oscillator,
    sub: Oscillator,
    primary_hz: AutomatedParam,
    secondary_hz: AutomatedParam,
    sub_hz: AutomatedParam,
    gain: AutomatedParam,
    shaper: Waveshaper,
}

impl CombustionLayer {
    fn new(sample_rate: f32, kind: EngineKind, curve: Arc<[f32]>) -> Self {
        let [wf_primary, wf_secondary, wf_sub] = kind.waveforms();
        Self {
            primary: Oscillator::new(sample_rate, wf_primary),
            secondary: Oscillator::new(sample_rate, wf_secondary),
            sub: Oscillator::new(sample_rate, wf_sub),
            primary_hz: AutomatedParam::new(0.0, sample_rate),
            secondary_hz: AutomatedParam::new(0.0, sample_rate),
            sub_hz: AutomatedParam::new(0.0, sample_rate),
            gain: AutomatedParam::new(1.0, sample_rate),
            shaper: Waveshaper::new(curve),
        }
    }

    fn process(&mut self) -> f32 {
        self.primary.set_frequency(self.primary_hz.advance());
        self.secondary.set_frequency(self.secondary_hz.advance());
        self.sub.set_frequency(self.sub_hz.advance());
        let mix = self.primary.advance() + self.secondary.advance() + self.sub.advance();
        self.shaper.process(mix * self.gain.advance())
    }

    pub(crate) fn tune(&mut self, primary_hz: f32, secondary_hz: f32, sub_hz: f32) {
        self.primary_hz.set_target(primary_hz, FREQ_TAU);
        self.secondary_hz.set_target(secondary_hz, FREQ_TAU);
        self.sub_hz.set_target(sub_hz, FREQ_TAU);
    }

    pub(crate) fn set_gain(&mut self, gain: f32) {
        self.gain.set_target(gain, GAIN_TAU);
    }
}

pub(crate) struct ExhaustStage {
    filter: Biquad,
    cutoff: AutomatedParam,
    q: f32,
}

impl ExhaustStage {
    fn new(sample_rate: f32) -> Self {
        let cutoff = AutomatedParam::new(600.0, sample_rate);
        let mut filter = Biquad::new();
        filter.set_lowpass(cutoff.value(), 0.5, sample_rate);
        Self {
            filter,
            cutoff,
            q: 0.5,
        }
    }

    /// Resonance changes take effect at the next coefficient refresh; the
    /// cutoff glides toward its target.
    pub(crate) fn set_target(&mut self, cutoff_hz: f32, q: f32) {
        self.cutoff.set_target(cutoff_hz, GAIN_TAU);
        self.q = q;
    }
}

pub(crate) struct IntakeLayer {
    source: NoiseSource,
    filter: Biquad,
    cutoff: AutomatedParam,
    gain: AutomatedParam,
}

impl IntakeLayer {
    const RESONANCE: f32 = 5.0;

    fn new(sample_rate: f32, pink: Arc<[f32]>) -> Self {
        let cutoff = AutomatedParam::new(400.0, sample_rate);
        let mut filter = Biquad::new();
        filter.set_lowpass(cutoff.value(), Self::RESONANCE, sample_rate);
        Self {
            source: NoiseSource::new(pink),
            filter,
            cutoff,
            gain: AutomatedParam::new(1.0, sample_rate),
        }
    }

    pub(crate) fn set_targets(&mut self, gain: f32, cutoff_hz: f32) {
        self.gain.set_target(gain, GAIN_TAU);
        self.cutoff.set_target(cutoff_hz, GAIN_TAU);
    }
}

pub(crate) struct MechanicalLayer {
    source: NoiseSource,
    filter: Biquad,
    gain: AutomatedParam,
}

impl MechanicalLayer {
    const CUTOFF_HZ: f32 = 2000.0;

    fn new(sample_rate: f32, white: Arc<[f32]>) -> Self {
        let mut filter = Biquad::new();
        filter.set_highpass(Self::CUTOFF_HZ, core::f32::consts::FRAC_1_SQRT_2, sample_rate);
        Self {
            source: NoiseSource::new(white),
            filter,
            gain: AutomatedParam::new(1.0, sample_rate),
        }
    }

    pub(crate) fn set_gain(&mut self, gain: f32) {
        self.gain.set_target(gain, GAIN_TAU);
    }
}

/// One running set of layers. Built on start, dropped on teardown.
pub(crate) struct LayerStack {
    sample_rate: f32,
    pub(crate) combustion: CombustionLayer,
    pub(crate) exhaust: ExhaustStage,
    pub(crate) intake: IntakeLayer,
    pub(crate) mechanical: MechanicalLayer,
    control_clock: u32,
}

impl LayerStack {
    pub(crate) fn new(
        sample_rate: f32,
        kind: EngineKind,
        noise: &NoiseBank,
        curve: Arc<[f32]>,
    ) -> Self {
        Self {
            sample_rate,
            combustion: CombustionLayer::new(sample_rate, kind, curve),
            exhaust: ExhaustStage::new(sample_rate),
            intake: IntakeLayer::new(sample_rate, Arc::clone(&noise.pink)),
            mechanical: MechanicalLayer::new(sample_rate, Arc::clone(&noise.white)),
            control_clock: 0,
        }
    }

    /// Render one pre-master sample: all three layers summed, combustion
    /// coloured by the exhaust low-pass.
    pub(crate) fn process(&mut self) -> f32 {
        self.exhaust.cutoff.advance();
        self.intake.cutoff.advance();
        if self.control_clock == 0 {
            self.refresh_filters();
        }
        self.control_clock += 1;
        if self.control_clock == CONTROL_INTERVAL {
            self.control_clock = 0;
        }

        let combustion = self.exhaust.filter.process(self.combustion.process());

        let intake = self.intake.filter.process(self.intake.source.advance())
            * self.intake.gain.advance();

        let mechanical = self
            .mechanical
            .filter
            .process(self.mechanical.source.advance())
            * self.mechanical.gain.advance();

        combustion + intake + mechanical
    }

    fn refresh_filters(&mut self) {
        self.exhaust
            .filter
            .set_lowpass(self.exhaust.cutoff.value(), self.exhaust.q, self.sample_rate);
        self.intake.filter.set_lowpass(
            self.intake.cutoff.value(),
            IntakeLayer::RESONANCE,
            self.sample_rate,
        );
    }

    pub(crate) fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            primary_hz: self.combustion.primary_hz.target(),
            secondary_hz: self.combustion.secondary_hz.target(),
            sub_hz: self.combustion.sub_hz.target(),
            combustion_gain: self.combustion.gain.target(),
            exhaust_cutoff_hz: self.exhaust.cutoff.target(),
            exhaust_q: self.exhaust.q,
            intake_gain: self.intake.gain.target(),
            intake_cutoff_hz: self.intake.cutoff.target(),
            mechanical_gain: self.mechanical.gain.target(),
        }
    }
}

/// Automation targets currently in force across the layer stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LayerSnapshot {
    pub primary_hz: f32,
    pub secondary_hz: f32,
    pub sub_hz: f32,
    pub combustion_gain: f32,
    pub exhaust_cutoff_hz: f32,
    pub exhaust_q: f32,
    pub intake_gain: f32,
    pub intake_cutoff_hz: f32,
    pub mechanical_gain: f32,
}
