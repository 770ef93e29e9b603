//! Engine and exhaust taxonomies with their fixed tuning tables.

use core::fmt;
use core::str::FromStr;

use rugido_core::Waveform;

/// Rev ceiling used to normalise RPM into a 0..1 factor.
pub const REDLINE_RPM: f32 = 14_000.0;

/// Cylinder configuration. Selects the oscillator waveform trio and the
/// combustion gain response to throttle load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Four cylinders, smooth and screaming. Detuned upper harmonic.
    Inline4,
    /// Two cylinders, lumpy low-end thump.
    VTwin,
    /// One big cylinder, raw and percussive.
    Single,
}

impl EngineKind {
    /// Waveforms for the primary, secondary and sub oscillators.
    #[must_use]
    pub fn waveforms(self) -> [Waveform; 3] {
        match self {
            Self::Inline4 => [Waveform::Saw, Waveform::Saw, Waveform::Square],
            Self::VTwin => [Waveform::Saw, Waveform::Square, Waveform::Saw],
            Self::Single => [Waveform::Square, Waveform::Saw, Waveform::Triangle],
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Inline4 => "inline4",
            Self::VTwin => "vtwin",
            Self::Single => "single",
        };
        f.write_str(name)
    }
}

impl FromStr for EngineKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inline4" | "inline-4" | "i4" => Ok(Self::Inline4),
            "vtwin" | "v-twin" | "v2" => Ok(Self::VTwin),
            "single" | "thumper" => Ok(Self::Single),
            _ => Err(ParseKindError(s.to_owned())),
        }
    }
}

/// Exhaust system fitted to the bike. Each maps to a fixed coloration
/// profile applied on every tuning update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExhaustKind {
    /// Factory silencer. Quiet and muffled.
    Stock,
    /// Aftermarket slip-on muffler.
    SlipOn,
    /// Full racing system, no restriction.
    FullRace,
    /// SC-Project style can. Loud, with a pronounced resonant bark.
    ScProject,
    /// Titanium system. Bright metallic ring.
    Titanium,
    /// Open shorty pipe. Crude and very loud.
    ShortPipe,
}

impl ExhaustKind {
    /// Every variant, in catalogue order.
    pub const ALL: [Self; 6] = [
        Self::Stock,
        Self::SlipOn,
        Self::FullRace,
        Self::ScProject,
        Self::Titanium,
        Self::ShortPipe,
    ];

    /// Fixed coloration profile for this exhaust.
    #[must_use]
    pub fn profile(self) -> ExhaustProfile {
        match self {
            Self::Stock => ExhaustProfile::new(600.0, 0.5, 0.8),
            Self::SlipOn => ExhaustProfile::new(1200.0, 1.0, 1.0),
            Self::FullRace => ExhaustProfile::new(2500.0, 2.0, 1.2),
            Self::ScProject => ExhaustProfile::new(4000.0, 4.0, 1.4),
            Self::Titanium => ExhaustProfile::new(3000.0, 8.0, 1.1),
            Self::ShortPipe => ExhaustProfile::new(800.0, 0.5, 1.5),
        }
    }
}

impl fmt::Display for ExhaustKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stock => "stock",
            Self::SlipOn => "slip-on",
            Self::FullRace => "full-race",
            Self::ScProject => "sc-project",
            Self::Titanium => "titanium",
            Self::ShortPipe => "short-pipe",
        };
        f.write_str(name)
    }
}

impl FromStr for ExhaustKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stock" => Ok(Self::Stock),
            "slip-on" | "slipon" => Ok(Self::SlipOn),
            "full-race" | "fullrace" => Ok(Self::FullRace),
            "sc-project" | "scproject" => Ok(Self::ScProject),
            "titanium" => Ok(Self::Titanium),
            "short-pipe" | "shortpipe" => Ok(Self::ShortPipe),
            _ => Err(ParseKindError(s.to_owned())),
        }
    }
}

/// Low-pass cutoff base, resonance and master gain scaling for one exhaust.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExhaustProfile {
    /// Base cutoff of the exhaust low-pass, before the RPM contribution.
    pub cutoff_hz: f32,
    /// Resonance of the exhaust low-pass.
    pub q: f32,
    /// Master gain multiplier, applied capped at unity.
    pub gain_factor: f32,
}

impl ExhaustProfile {
    const fn new(cutoff_hz: f32, q: f32, gain_factor: f32) -> Self {
        Self {
            cutoff_hz,
            q,
            gain_factor,
        }
    }
}

/// Error for [`EngineKind`] and [`ExhaustKind`] parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(String);

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised name: {:?}", self.0)
    }
}

impl std::error::Error for ParseKindError {}
