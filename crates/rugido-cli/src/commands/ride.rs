//! Live ride command: streams the engine to an output device while the
//! driving simulation works the throttle.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use clap::Args;
use rugido_engine::{bike_by_id, EngineKind, EngineSound, ExhaustKind};
use rugido_io::{AudioOutput, OutputConfig};
use tracing::debug;

use crate::sim::{demo_throttle, SimFrame, Simulation, TICK_RATE};

#[derive(Args)]
pub struct RideArgs {
    /// Bike to ride (see `rugido garage`)
    #[arg(default_value = "diavel")]
    bike: String,

    /// Exhaust system
    #[arg(short, long, default_value = "stock")]
    exhaust: ExhaustArg,

    /// Hold the throttle at a fixed position instead of the demo script
    #[arg(short, long)]
    throttle: Option<f32>,

    /// Stop after this many seconds (default: until Ctrl+C)
    #[arg(short, long)]
    duration: Option<f32>,

    /// Output device name (substring match)
    #[arg(long)]
    device: Option<String>,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Buffer size
    #[arg(long, default_value = "512")]
    buffer_size: u32,
}

/// Thin clap wrapper so `--exhaust sc-project` parses with a useful error.
#[derive(Clone)]
pub struct ExhaustArg(pub ExhaustKind);

impl std::str::FromStr for ExhaustArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ExhaustKind>()
            .map(ExhaustArg)
            .map_err(|e| format!("{e} (try: stock, slip-on, full-race, sc-project, titanium, short-pipe)"))
    }
}

pub fn run(args: RideArgs) -> anyhow::Result<()> {
    let bike = *bike_by_id(&args.bike)
        .ok_or_else(|| anyhow::anyhow!("unknown bike '{}', see `rugido garage`", args.bike))?;
    let exhaust = args.exhaust.0;

    let engine = Arc::new(Mutex::new(EngineSound::new(args.sample_rate as f32)));
    engine
        .lock()
        .expect("engine lock")
        .start(bike.kind);

    let output = AudioOutput::start(
        Arc::clone(&engine),
        OutputConfig {
            sample_rate: args.sample_rate,
            buffer_size: args.buffer_size,
            channels: 2,
            device_name: args.device.clone(),
        },
    )?;

    println!("Riding the {} ({} Hz, {})", bike.name, bike.base_freq_hz, bike.kind);
    println!("  Exhaust: {}", exhaust);
    println!("  Device:  {}", output.device());
    println!("\nPress Ctrl+C to stop...\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut sim = Simulation::new(bike, exhaust, 0x2a2a_2a2a);
    let tick = Duration::from_secs_f32(1.0 / TICK_RATE);
    let started = Instant::now();

    while running.load(Ordering::SeqCst) {
        let elapsed = started.elapsed().as_secs_f32();
        if let Some(limit) = args.duration
            && elapsed >= limit
        {
            break;
        }

        sim.set_throttle(args.throttle.map_or_else(|| demo_throttle(elapsed), |t| t));
        let frame = sim.step();
        drive_engine(output.engine(), &bike, exhaust, frame);

        print!(
            "\r  {:>5.0} km/h  gear {}  {:>5.0} rpm   ",
            frame.speed, frame.gear, frame.rpm
        );
        std::io::stdout().flush().ok();

        std::thread::sleep(tick);
    }

    // Fade out before the stream drops.
    engine.lock().expect("engine lock").stop();
    std::thread::sleep(Duration::from_millis(400));
    drop(output);

    println!("\nDone!");
    Ok(())
}

/// Push one simulation frame into the shared engine.
pub fn drive_engine(
    engine: &Arc<Mutex<EngineSound>>,
    bike: &rugido_engine::BikeConfig,
    exhaust: ExhaustKind,
    frame: SimFrame,
) {
    let mut engine = engine.lock().expect("engine lock");
    drive_engine_locked(&mut engine, bike.kind, bike.base_freq_hz, exhaust, frame);
}

/// Same, for callers that already hold the engine.
pub fn drive_engine_locked(
    engine: &mut EngineSound,
    kind: EngineKind,
    base_freq_hz: f32,
    exhaust: ExhaustKind,
    frame: SimFrame,
) {
    engine.update(frame.rpm, frame.load, kind, base_freq_hz, exhaust);
    if frame.shifted {
        debug!(gear = frame.gear, rpm = frame.rpm, "gear change");
        engine.trigger_shift();
    }
    if frame.backfire {
        debug!(rpm = frame.rpm, "backfire");
        engine.trigger_backfire();
    }
}
