use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static-ish contract metadata for a symbol as reported by the terminal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractMeta {
    /// Current spread in points.
    #[serde(default)]
    pub spread: i64,
    #[serde(default)]
    pub bid: f64,
    #[serde(default)]
    pub ask: f64,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub session_open: f64,
    #[serde(default)]
    pub session_close: f64,
    #[serde(default)]
    pub swap_long: f64,
    #[serde(default)]
    pub swap_short: f64,
}

/// Latest quote for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    pub bid: f64,
    pub ask: f64,
    #[serde(default)]
    pub last: f64,
    #[serde(default)]
    pub volume: u64,
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{time: {}, bid: {}, ask: {}, last: {}, volume: {}}}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.bid,
            self.ask,
            self.last,
            self.volume
        )
    }
}
