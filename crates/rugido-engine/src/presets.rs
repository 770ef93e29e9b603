//! The garage: built-in bike definitions.

use crate::types::EngineKind;

/// A complete bike: engine character plus gearbox ratios for the
/// driving simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BikeConfig {
    /// Stable identifier, usable on a command line.
    pub id: &'static str,
    /// Human-readable model name.
    pub name: &'static str,
    /// Cylinder layout.
    pub kind: EngineKind,
    /// Fundamental combustion frequency at idle, in Hz.
    pub base_freq_hz: f32,
    /// Fundamental at redline, in Hz. Informational; the synthesis law
    /// derives pitch from RPM directly.
    pub max_freq_hz: f32,
    /// Idle roughness, 0 smooth to 1 lumpy.
    pub roughness: f32,
    /// One-line character blurb for the garage listing.
    pub description: &'static str,
    /// Top speed per gear, km/h. Index 0 is neutral.
    pub gear_ratios: [f32; 7],
}

/// Every built-in bike.
pub const BIKES: [BikeConfig; 3] = [
    BikeConfig {
        id: "s1000",
        name: "Super Sport RR (1000cc)",
        kind: EngineKind::Inline4,
        base_freq_hz: 120.0,
        max_freq_hz: 800.0,
        roughness: 0.1,
        description: "Smooth, screaming, track-bred top end",
        gear_ratios: [0.0, 110.0, 150.0, 190.0, 230.0, 260.0, 320.0],
    },
    BikeConfig {
        id: "diavel",
        name: "Power Cruiser (1260cc)",
        kind: EngineKind::VTwin,
        base_freq_hz: 60.0,
        max_freq_hz: 400.0,
        roughness: 0.8,
        description: "Heavy torque, big lumpy twin",
        gear_ratios: [0.0, 90.0, 130.0, 170.0, 210.0, 240.0, 280.0],
    },
    BikeConfig {
        id: "crf",
        name: "Dirt Track (300cc)",
        kind: EngineKind::Single,
        base_freq_hz: 50.0,
        max_freq_hz: 300.0,
        roughness: 0.9,
        description: "One big cylinder, tight and percussive",
        gear_ratios: [0.0, 50.0, 80.0, 105.0, 125.0, 140.0, 160.0],
    },
];

/// Look a bike up by its identifier, case-insensitively.
#[must_use]
pub fn bike_by_id(id: &str) -> Option<&'static BikeConfig> {
    BIKES.iter().find(|b| b.id.eq_ignore_ascii_case(id))
}

impl BikeConfig {
    /// Highest forward gear.
    #[must_use]
    pub fn top_gear(&self) -> usize {
        self.gear_ratios.len() - 1
    }

    /// Top speed in the given gear, km/h. Neutral and out-of-range gears
    /// report zero.
    #[must_use]
    pub fn max_speed(&self, gear: usize) -> f32 {
        self.gear_ratios.get(gear).copied().unwrap_or(0.0)
    }
}
