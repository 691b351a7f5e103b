// =============================================================================
// Floor-Trader Pivot Levels
// =============================================================================
//
// Classic pivots from the last *completed* bar of a reference timeframe.  The
// newest bar is still forming, so the source bar is the second-to-last one:
//
//   PP = (H + L + C) / 3
//   R1 = 2·PP − L        S1 = 2·PP − H
//   R2 = PP + (H − L)    S2 = PP − (H − L)
//
// Stateless and independent of the indicator columns.

use serde::Serialize;

use crate::market_data::Bar;

/// The five pivot levels; all `None` when the series is too short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PivotSet {
    pub pp: Option<f64>,
    pub r1: Option<f64>,
    pub s1: Option<f64>,
    pub r2: Option<f64>,
    pub s2: Option<f64>,
}

impl PivotSet {
    /// Levels derived from one bar's high, low and close.
    pub fn from_hlc(high: f64, low: f64, close: f64) -> Self {
        let pp = (high + low + close) / 3.0;
        let span = high - low;
        Self {
            pp: Some(pp),
            r1: Some(2.0 * pp - low),
            s1: Some(2.0 * pp - high),
            r2: Some(pp + span),
            s2: Some(pp - span),
        }
    }
}

/// Pivots from `bars[len - 2]`, or an all-undefined set with fewer than two
/// bars.
pub fn calculate_pivots(bars: &[Bar]) -> PivotSet {
    match bars.len().checked_sub(2).and_then(|i| bars.get(i)) {
        Some(bar) => PivotSet::from_hlc(bar.high, bar.low, bar.close),
        None => PivotSet::default(),
    }
}

impl std::fmt::Display for PivotSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |x| x.to_string());
        write!(
            f,
            "{{PP: {}, R1: {}, S1: {}, R2: {}, S2: {}}}",
            level(self.pp),
            level(self.r1),
            level(self.s1),
            level(self.r2),
            level(self.s2)
        )
    }
}
