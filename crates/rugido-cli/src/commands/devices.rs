//! Audio device listing command.

use rugido_io::list_output_devices;

pub fn run() -> anyhow::Result<()> {
    let devices = list_output_devices()?;

    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    println!("Output Devices");
    println!("==============\n");
    for (idx, device) in devices.iter().enumerate() {
        println!("  [{}] {} ({} Hz)", idx, device.name, device.default_sample_rate);
    }
    println!("\nTip: pick one by partial name with `rugido ride --device \"USB\"`");

    Ok(())
}
