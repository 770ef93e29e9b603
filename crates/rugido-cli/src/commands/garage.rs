//! Garage command: list the built-in bikes and exhaust systems.

use clap::Args;
use rugido_engine::{ExhaustKind, BIKES};

#[derive(Args)]
pub struct GarageArgs {
    /// Show the exhaust coloration numbers too
    #[arg(long)]
    detailed: bool,
}

pub fn run(args: GarageArgs) -> anyhow::Result<()> {
    println!("Bikes");
    println!("=====\n");
    for bike in &BIKES {
        println!("  {:<10} {} ({})", bike.id, bike.name, bike.kind);
        println!("  {:<10} {}", "", bike.description);
        println!(
            "  {:<10} base {} Hz, roughness {}, top speed {} km/h",
            "", bike.base_freq_hz, bike.roughness, bike.max_speed(bike.top_gear())
        );
        println!();
    }

    println!("Exhausts");
    println!("========\n");
    for exhaust in ExhaustKind::ALL {
        if args.detailed {
            let p = exhaust.profile();
            println!(
                "  {:<12} cutoff {} Hz, Q {}, gain x{}",
                exhaust.to_string(),
                p.cutoff_hz,
                p.q,
                p.gain_factor
            );
        } else {
            println!("  {}", exhaust);
        }
    }

    Ok(())
}
