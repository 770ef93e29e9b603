//! Rugido Core - DSP primitives for procedural engine-sound synthesis
//!
//! This crate provides the signal-level building blocks the rugido engine is
//! assembled from: oscillators, noise banks, filters, a waveshaper, a master
//! bus compressor, and parameter automation. Everything here is real-time
//! safe once constructed (no allocation in the per-sample paths).
//!
//! # Core Abstractions
//!
//! - [`AutomatedParam`] - a node parameter with scheduled transitions:
//!   exponential approach toward a target, linear ramps, and geometric
//!   (exponential) ramps for transient envelopes
//! - [`Oscillator`] - band-limited periodic source (PolyBLEP)
//! - [`NoiseBank`] / [`NoiseSource`] - shared white/pink noise buffers and
//!   looping playback over them
//! - [`Waveshaper`] / [`distortion_curve`] - static transfer-function
//!   saturation
//! - [`Biquad`] - second-order IIR filter with RBJ cookbook coefficients
//! - [`Compressor`] - soft-knee feed-forward dynamics compressor
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (uses `alloc` for the noise and curve
//! tables). Disable the default `std` feature for embedded targets.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod biquad;
pub mod compressor;
pub mod envelope;
pub mod math;
pub mod noise;
pub mod oscillator;
pub mod param;
pub mod shaper;

pub use biquad::{Biquad, highpass_coefficients, lowpass_coefficients};
pub use compressor::Compressor;
pub use envelope::EnvelopeFollower;
pub use math::{db_to_linear, hard_clip, linear_to_db};
pub use noise::{NoiseBank, NoiseSource, XorShift32};
pub use oscillator::{Oscillator, Waveform};
pub use param::AutomatedParam;
pub use shaper::{DISTORTION_CURVE_LEN, Waveshaper, distortion_curve};
