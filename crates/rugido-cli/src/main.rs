//! rugido CLI - ride, render and inspect procedural motorcycle engines.

mod commands;
mod sim;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rugido")]
#[command(author, version, about = "Procedural motorcycle engine sound", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ride a bike live through the speakers
    Ride(commands::ride::RideArgs),

    /// Render a ride offline to a WAV file
    Render(commands::render::RenderArgs),

    /// List the bikes and exhausts in the garage
    Garage(commands::garage::GarageArgs),

    /// List audio output devices
    Devices,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ride(args) => commands::ride::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Garage(args) => commands::garage::run(args),
        Commands::Devices => commands::devices::run(),
    }
}
