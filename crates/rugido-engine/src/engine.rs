//! The engine-sound synthesizer: lifecycle, per-frame tuning and the
//! per-sample render path.

use std::sync::Arc;

use rugido_core::{hard_clip, AutomatedParam, Compressor, NoiseBank};
use tracing::{debug, info};

use crate::layer::{LayerStack, GAIN_TAU};
use crate::transient::{Transient, TransientPool};
use crate::types::{EngineKind, ExhaustKind, REDLINE_RPM};

/// Master fade-in after a start.
const FADE_IN_SECS: f32 = 0.5;
/// Time constant of the master fade-out on stop.
const STOP_TAU: f32 = 0.2;
/// Layers are dropped this long after a stop, once the fade is inaudible.
const TEARDOWN_GRACE_SECS: f32 = 0.3;

/// Master-bus compressor settings.
const COMP_THRESHOLD_DB: f32 = -20.0;
const COMP_KNEE_DB: f32 = 10.0;
const COMP_RATIO: f32 = 12.0;
const COMP_ATTACK_MS: f32 = 5.0;
const COMP_RELEASE_MS: f32 = 100.0;

/// Waveshaper drive for the combustion layer.
const DISTORTION_AMOUNT: f32 = 100.0;

#[derive(Clone, Copy)]
struct PendingTeardown {
    deadline: u64,
    generation: u64,
}

/// A complete motorcycle engine voice.
///
/// Construction allocates the shared noise buffers and distortion curve
/// once; [`start`](Self::start) and [`stop`](Self::stop) only build and
/// drop the lightweight layer stack. All methods are plain `&mut self`;
/// wrap the engine in a mutex to drive it from an audio callback.
pub struct EngineSound {
    sample_rate: f32,
    noise: NoiseBank,
    curve: Arc<[f32]>,
    master_gain: AutomatedParam,
    compressor: Compressor,
    layers: Option<LayerStack>,
    transients: TransientPool,
    clock: u64,
    generation: u64,
    pending_teardown: Option<PendingTeardown>,
}

impl EngineSound {
    /// Build an idle engine for the given sample rate.
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        let noise = NoiseBank::generate(sample_rate as u32);
        info!(sample_rate, "engine voice ready");
        Self {
            sample_rate,
            noise,
            curve: rugido_core::distortion_curve(DISTORTION_AMOUNT),
            master_gain: AutomatedParam::new(0.0, sample_rate),
            compressor: Compressor::new(
                sample_rate,
                COMP_THRESHOLD_DB,
                COMP_KNEE_DB,
                COMP_RATIO,
                COMP_ATTACK_MS,
                COMP_RELEASE_MS,
            ),
            layers: None,
            transients: TransientPool::default(),
            clock: 0,
            generation: 0,
            pending_teardown: None,
        }
    }

    /// Start (or restart) the engine with the given cylinder layout.
    ///
    /// Any previous layer stack is torn down synchronously and a pending
    /// deferred teardown from an earlier [`stop`](Self::stop) is voided,
    /// so it can never reap the new stack.
    pub fn start(&mut self, kind: EngineKind) {
        if self.layers.is_some() {
            debug!("replacing running layer stack");
        }
        self.generation += 1;
        self.pending_teardown = None;
        self.layers = Some(LayerStack::new(
            self.sample_rate,
            kind,
            &self.noise,
            Arc::clone(&self.curve),
        ));
        self.compressor.reset();
        self.master_gain.set_now(0.0);
        self.master_gain.ramp_linear(1.0, FADE_IN_SECS);
        info!(engine = %kind, "engine started");
    }

    /// Fade the master gain out and schedule the layer teardown.
    pub fn stop(&mut self) {
        self.master_gain.set_target(0.0, STOP_TAU);
        if self.layers.is_some() {
            let deadline = self.clock + (TEARDOWN_GRACE_SECS * self.sample_rate) as u64;
            self.pending_teardown = Some(PendingTeardown {
                deadline,
                generation: self.generation,
            });
            info!("engine stopping");
        }
    }

    /// Whether a layer stack is currently sounding (or fading out).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.layers.is_some()
    }

    /// Retune every layer from the current simulation frame.
    ///
    /// RPM is clamped non-negative and load to the unit interval. No-op
    /// while stopped.
    pub fn update(
        &mut self,
        rpm: f32,
        load: f32,
        kind: EngineKind,
        base_freq_hz: f32,
        exhaust: ExhaustKind,
    ) {
        let Some(stack) = &mut self.layers else {
            return;
        };
        let rpm = rpm.max(0.0);
        let load = load.clamp(0.0, 1.0);
        let rpm_factor = rpm / REDLINE_RPM;
        let freq1 = base_freq_hz * (1.0 + rpm_factor * 8.0);

        match kind {
            EngineKind::Inline4 => {
                stack.combustion.tune(freq1, freq1 * 2.01, freq1 * 0.5);
                stack.combustion.set_gain(0.6 + load * 0.2);
            }
            EngineKind::VTwin => {
                stack.combustion.tune(freq1, freq1 * 0.5, freq1 * 0.75);
                stack.combustion.set_gain(0.8 + load * 0.4);
            }
            // A thumper's body comes from the waveforms alone; its
            // combustion gain is left where the stack put it.
            EngineKind::Single => {
                stack.combustion.tune(freq1, freq1 * 0.5, freq1 * 0.25);
            }
        }

        let profile = exhaust.profile();
        stack.exhaust.set_target(profile.cutoff_hz + rpm * 0.5, profile.q);
        stack.intake.set_targets(load * 0.8, 400.0 + rpm * 0.8);
        stack.mechanical.set_gain(0.1 + rpm_factor * 0.2);
        self.master_gain
            .set_target(profile.gain_factor.min(1.0), GAIN_TAU);
    }

    /// Fire an exhaust backfire pop. Independent of the run state.
    pub fn trigger_backfire(&mut self) {
        debug!("backfire");
        self.transients.spawn(Transient::backfire(self.sample_rate));
    }

    /// Fire a gear-shift click. Independent of the run state.
    pub fn trigger_shift(&mut self) {
        debug!("shift click");
        self.transients.spawn(Transient::shift(self.sample_rate));
    }

    /// Render one output sample.
    ///
    /// Sustained layers pass through the master gain and compressor;
    /// transients join after the compressor; the sum is hard-clipped.
    pub fn process(&mut self) -> f32 {
        self.clock += 1;
        if let Some(pending) = self.pending_teardown
            && self.clock >= pending.deadline
        {
            if pending.generation == self.generation {
                self.layers = None;
                debug!("layer stack torn down");
            }
            self.pending_teardown = None;
        }

        let sustained = self.layers.as_mut().map_or(0.0, LayerStack::process);
        let compressed = self.compressor.process(sustained * self.master_gain.advance());
        hard_clip(compressed + self.transients.process(), 1.0)
    }

    /// Fill `out` with consecutive mono samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for slot in out {
            *slot = self.process();
        }
    }

    /// Current automation targets, or `None` while stopped.
    #[must_use]
    pub fn tuning(&self) -> Option<TuningSnapshot> {
        self.layers.as_ref().map(|stack| {
            let s = stack.snapshot();
            TuningSnapshot {
                primary_hz: s.primary_hz,
                secondary_hz: s.secondary_hz,
                sub_hz: s.sub_hz,
                combustion_gain: s.combustion_gain,
                exhaust_cutoff_hz: s.exhaust_cutoff_hz,
                exhaust_q: s.exhaust_q,
                intake_gain: s.intake_gain,
                intake_cutoff_hz: s.intake_cutoff_hz,
                mechanical_gain: s.mechanical_gain,
                master_gain: self.master_gain.target(),
            }
        })
    }

    /// Configured sample rate in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The shared noise buffers. Exposed so callers can verify that
    /// restarts reuse the same allocations.
    #[must_use]
    pub fn noise_bank(&self) -> &NoiseBank {
        &self.noise
    }

    /// Number of transients currently sounding.
    #[must_use]
    pub fn active_transients(&self) -> usize {
        self.transients.len()
    }

    /// Drop everything sounding immediately, without a fade.
    pub fn reset(&mut self) {
        self.layers = None;
        self.pending_teardown = None;
        self.transients.clear();
        self.master_gain.set_now(0.0);
        self.compressor.reset();
    }
}

/// Automation targets currently in force, for display and for tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningSnapshot {
    /// Primary oscillator frequency target in Hz.
    pub primary_hz: f32,
    /// Secondary oscillator frequency target in Hz.
    pub secondary_hz: f32,
    /// Sub oscillator frequency target in Hz.
    pub sub_hz: f32,
    /// Combustion layer gain target.
    pub combustion_gain: f32,
    /// Exhaust low-pass cutoff target in Hz.
    pub exhaust_cutoff_hz: f32,
    /// Exhaust low-pass resonance.
    pub exhaust_q: f32,
    /// Intake layer gain target.
    pub intake_gain: f32,
    /// Intake low-pass cutoff target in Hz.
    pub intake_cutoff_hz: f32,
    /// Mechanical layer gain target.
    pub mechanical_gain: f32,
    /// Master gain target.
    pub master_gain: f32,
}
