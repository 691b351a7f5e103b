use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Timeframe;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar as delivered by the terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub tick_volume: u64,
}

impl Bar {
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, tick_volume: u64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            tick_volume,
        }
    }
}

/// Composite key that identifies a unique bar series.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeriesKey {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.timeframe)
    }
}

// ---------------------------------------------------------------------------
// Series -- bounded most-recent-K window per (symbol, timeframe)
// ---------------------------------------------------------------------------

/// The most recent `capacity` bars of one `(symbol, timeframe)` pair, oldest
/// first.  Built fresh on every cycle and dropped afterwards.
#[derive(Debug, Clone)]
pub struct Series {
    pub key: SeriesKey,
    bars: Vec<Bar>,
}

impl Series {
    /// Wrap `bars` (oldest first), keeping only the newest `capacity`.
    pub fn new(key: SeriesKey, mut bars: Vec<Bar>, capacity: usize) -> Self {
        if bars.len() > capacity {
            bars.drain(..bars.len() - capacity);
        }
        Self { key, bars }
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar(minute: i64, close: f64) -> Bar {
        let time = Utc.timestamp_opt(1_700_000_000 + minute * 60, 0).unwrap();
        Bar::new(time, close, close + 1.0, close - 1.0, close, 100)
    }

    fn key() -> SeriesKey {
        SeriesKey {
            symbol: "XAUUSD".into(),
            timeframe: Timeframe::M1,
        }
    }

    #[test]
    fn window_keeps_most_recent_bars() {
        let bars: Vec<Bar> = (0..5).map(|i| sample_bar(i, 100.0 + i as f64)).collect();
        let series = Series::new(key(), bars, 3);
        assert!(!series.is_empty());
        let closes: Vec<f64> = series.into_bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![102.0, 103.0, 104.0]);
    }

    #[test]
    fn short_input_is_untouched() {
        let bars: Vec<Bar> = (0..2).map(|i| sample_bar(i, 1.0)).collect();
        let series = Series::new(key(), bars.clone(), 500);
        assert_eq!(series.into_bars(), bars);
        assert!(Series::new(key(), Vec::new(), 500).is_empty());
    }

    #[test]
    fn key_display() {
        assert_eq!(key().to_string(), "XAUUSD@M1");
    }
}
