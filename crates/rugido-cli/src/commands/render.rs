//! Offline render command: run the simulation and engine faster than
//! real time and write the result to a WAV file.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rugido_engine::{bike_by_id, EngineSound};
use rugido_io::{write_wav, WavSpec};

use crate::commands::ride::{drive_engine_locked, ExhaustArg};
use crate::sim::{demo_throttle, Simulation, TICK_RATE};

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Bike to render (see `rugido garage`)
    #[arg(short, long, default_value = "diavel")]
    bike: String,

    /// Exhaust system
    #[arg(short, long, default_value = "stock")]
    exhaust: ExhaustArg,

    /// Length of the ride in seconds
    #[arg(short, long, default_value = "24.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Bit depth (16 for PCM, 32 for float)
    #[arg(long, default_value = "16")]
    bits: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.duration > 0.0, "duration must be positive");
    let bike = *bike_by_id(&args.bike)
        .ok_or_else(|| anyhow::anyhow!("unknown bike '{}', see `rugido garage`", args.bike))?;
    let exhaust = args.exhaust.0;
    let sample_rate = args.sample_rate as f32;

    let mut engine = EngineSound::new(sample_rate);
    engine.start(bike.kind);

    let mut sim = Simulation::new(bike, exhaust, 0x2a2a_2a2a);
    let total_ticks = (args.duration * TICK_RATE).ceil() as u64;
    let samples_per_tick = (sample_rate / TICK_RATE) as usize;

    println!(
        "Rendering {:.1}s of the {} with a {} exhaust",
        args.duration, bike.name, exhaust
    );

    let pb = ProgressBar::new(total_ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut samples = Vec::with_capacity(total_ticks as usize * samples_per_tick);
    let mut block = vec![0.0f32; samples_per_tick];
    for tick in 0..total_ticks {
        sim.set_throttle(demo_throttle(tick as f32 / TICK_RATE));
        let frame = sim.step();
        drive_engine_locked(&mut engine, bike.kind, bike.base_freq_hz, exhaust, frame);

        engine.render(&mut block);
        samples.extend_from_slice(&block);
        pb.inc(1);
    }
    pb.finish();

    write_wav(
        &args.output,
        &samples,
        WavSpec {
            channels: 1,
            sample_rate: args.sample_rate,
            bits_per_sample: args.bits,
        },
    )?;

    println!(
        "Wrote {} ({} samples at {} Hz)",
        args.output.display(),
        samples.len(),
        args.sample_rate
    );
    Ok(())
}
