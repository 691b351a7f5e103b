// =============================================================================
// Shared types used across the Aurora snapshot engine
// =============================================================================

use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Bar granularity recognised by the terminal bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    /// Length of one bar in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            Self::M1 => 1,
            Self::M5 => 5,
            Self::M15 => 15,
            Self::M30 => 30,
            Self::H1 => 60,
            Self::H4 => 240,
            Self::D1 => 1440,
        }
    }

    /// Identifier used on the bridge wire and in report section headers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::M1 => "M1",
            Self::M5 => "M5",
            Self::M15 => "M15",
            Self::M30 => "M30",
            Self::H1 => "H1",
            Self::H4 => "H4",
            Self::D1 => "D1",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Trading session a bar falls into, keyed on its UTC hour-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    Asia,
    LondonOpenRamp,
    London,
    NyOverlapSpike,
    Ny,
    AfterHours,
}

impl Session {
    /// Total mapping from an hour in `0..24` to its session.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=6 => Self::Asia,
            7 => Self::LondonOpenRamp,
            8..=12 => Self::London,
            13 => Self::NyOverlapSpike,
            14..=16 => Self::Ny,
            _ => Self::AfterHours,
        }
    }

    pub fn from_time(time: &chrono::DateTime<chrono::Utc>) -> Self {
        Self::from_hour(time.hour())
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asia => write!(f, "Asia"),
            Self::LondonOpenRamp => write!(f, "London Open Ramp"),
            Self::London => write!(f, "London"),
            Self::NyOverlapSpike => write!(f, "NY Overlap Spike"),
            Self::Ny => write!(f, "NY"),
            Self::AfterHours => write!(f, "After-Hours"),
        }
    }
}
