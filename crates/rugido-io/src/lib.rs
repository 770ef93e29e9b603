//! Audio I/O for the rugido engine synthesizer.
//!
//! This crate provides:
//!
//! - **Live output**: [`AudioOutput`] streams an [`EngineSound`] to the
//!   default (or a named) output device via cpal
//! - **WAV export**: [`write_wav`] for saving rendered audio
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::{Arc, Mutex};
//! use rugido_engine::{EngineKind, EngineSound};
//! use rugido_io::{AudioOutput, OutputConfig};
//!
//! let config = OutputConfig::default();
//! let engine = Arc::new(Mutex::new(EngineSound::new(config.sample_rate as f32)));
//! engine.lock().unwrap().start(EngineKind::VTwin);
//!
//! let output = AudioOutput::start(Arc::clone(&engine), config)?;
//! // Audio plays until `output` is dropped.
//! ```
//!
//! [`EngineSound`]: rugido_engine::EngineSound

mod output;
mod wav;

pub use output::{list_output_devices, AudioOutput, OutputConfig, OutputDevice};
pub use wav::{write_wav, WavSpec};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
