//! Live audio output via cpal.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rugido_engine::EngineSound;
use tracing::{error, info};

use crate::{Error, Result};

/// Output stream parameters.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Requested hardware buffer size in frames.
    pub buffer_size: u32,
    /// Number of output channels. The mono engine signal is duplicated
    /// across all of them.
    pub channels: u16,
    /// Substring match against device names; `None` for the default device.
    pub device_name: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 512,
            channels: 2,
            device_name: None,
        }
    }
}

/// Output device information.
#[derive(Debug, Clone)]
pub struct OutputDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate reported by the device.
    pub default_sample_rate: u32,
}

fn device_name(device: &cpal::Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Enumerate output devices on the default host.
pub fn list_output_devices() -> Result<Vec<OutputDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();
    for device in host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
    {
        if let Ok(name) = device_name(&device) {
            let default_sample_rate = device
                .default_output_config()
                .map(|c| c.sample_rate())
                .unwrap_or(48000);
            devices.push(OutputDevice {
                name,
                default_sample_rate,
            });
        }
    }
    Ok(devices)
}

fn find_output_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device> {
    match name {
        Some(search) => {
            let search_lower = search.to_lowercase();
            let devices = host
                .output_devices()
                .map_err(|e| Error::Stream(e.to_string()))?;
            for device in devices {
                if let Ok(dev_name) = device_name(&device)
                    && dev_name.to_lowercase().contains(search_lower.as_str())
                {
                    return Ok(device);
                }
            }
            Err(Error::DeviceNotFound(format!(
                "no output device matching '{}'",
                search
            )))
        }
        None => host.default_output_device().ok_or(Error::NoDevice),
    }
}

/// A running output stream fed by a shared [`EngineSound`].
///
/// The audio callback locks the engine once per buffer, renders a mono
/// block and fans it out to every channel. Playback stops when this
/// handle is dropped.
pub struct AudioOutput {
    stream: cpal::Stream,
    engine: Arc<Mutex<EngineSound>>,
    device: String,
}

impl AudioOutput {
    /// Open the device and start playback.
    pub fn start(engine: Arc<Mutex<EngineSound>>, config: OutputConfig) -> Result<Self> {
        let shared = Arc::clone(&engine);
        let host = cpal::default_host();
        let device = find_output_device(&host, config.device_name.as_deref())?;
        let name = device_name(&device).unwrap_or_else(|_| "unknown".into());

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
        };

        let channels = config.channels as usize;
        let mut mono = vec![0.0f32; config.buffer_size as usize];
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;
                    if mono.len() < frames {
                        mono.resize(frames, 0.0);
                    }
                    match engine.lock() {
                        Ok(mut engine) => engine.render(&mut mono[..frames]),
                        Err(_) => mono[..frames].fill(0.0),
                    }
                    for (frame, &sample) in data.chunks_mut(channels).zip(mono.iter()) {
                        frame.fill(sample);
                    }
                },
                move |err| {
                    error!(error = %err, "output stream error");
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        info!(
            device = %name,
            channels = config.channels,
            sample_rate = config.sample_rate,
            "output stream started"
        );

        Ok(Self {
            stream,
            engine: shared,
            device: name,
        })
    }

    /// The engine handle driving this stream, for the control loop.
    #[must_use]
    pub fn engine(&self) -> &Arc<Mutex<EngineSound>> {
        &self.engine
    }

    /// Name of the device the stream is attached to.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Pause playback without tearing the stream down.
    pub fn pause(&self) -> Result<()> {
        self.stream
            .pause()
            .map_err(|e| Error::Stream(e.to_string()))
    }

    /// Resume a paused stream.
    pub fn resume(&self) -> Result<()> {
        self.stream.play().map_err(|e| Error::Stream(e.to_string()))
    }
}
