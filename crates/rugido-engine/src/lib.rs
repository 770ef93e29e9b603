//! Procedural motorcycle engine-sound synthesis.
//!
//! An [`EngineSound`] renders the voice of a running motorcycle one
//! sample at a time: three combustion oscillators driven through a
//! waveshaper and an exhaust low-pass, pink-noise intake hiss, white-noise
//! valvetrain clatter, a master bus with a soft-knee compressor, and
//! one-shot backfire and gear-shift transients mixed in after it.
//!
//! The caller owns the clock. Feed [`EngineSound::update`] from a
//! simulation or control surface at any rate (60 Hz works well) and pull
//! samples with [`EngineSound::process`] or [`EngineSound::render`] from
//! the audio thread.
//!
//! ```
//! use rugido_engine::{EngineKind, EngineSound, ExhaustKind};
//!
//! let mut engine = EngineSound::new(48_000.0);
//! engine.start(EngineKind::VTwin);
//! engine.update(3_000.0, 0.4, EngineKind::VTwin, 60.0, ExhaustKind::SlipOn);
//!
//! let mut block = [0.0f32; 512];
//! engine.render(&mut block);
//! ```

mod engine;
mod layer;
mod presets;
mod transient;
mod types;

pub use engine::{EngineSound, TuningSnapshot};
pub use presets::{bike_by_id, BikeConfig, BIKES};
pub use types::{EngineKind, ExhaustKind, ExhaustProfile, ParseKindError, REDLINE_RPM};
