// =============================================================================
// Indicator Set — the full feature battery for one bar series
// =============================================================================
//
// `IndicatorSet::compute` runs every indicator over one series and keeps the
// results as columns aligned index-for-index with the input bars.  The input
// is only borrowed; bars are never modified.  `FeatureRow` joins one bar with
// its column values for snapshot and report output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::atr::{calculate_atr, ATR_PERIOD};
use super::bollinger::{calculate_bandwidth, BOLLINGER_NUM_STD, BOLLINGER_PERIOD};
use super::ema::{calculate_ema, ema_slope};
use super::macd::calculate_macd;
use super::rolling::rolling_mean;
use super::rsi::{calculate_rsi, RSI_PERIOD};
use super::spikes::{spike_flags, SPIKE_FACTOR, SPIKE_PERIOD};
use super::structure::{body, fractal_highs, fractal_lows, range};
use super::vwap::calculate_vwap;
use crate::market_data::Bar;
use crate::types::Session;

/// Window for the tick-volume average column.
pub const VOLUME_AVG_PERIOD: usize = 10;

/// Derived columns for one series.  Every vector has the series' length.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub ema9: Vec<f64>,
    pub ema21: Vec<f64>,
    pub ema50: Vec<f64>,
    pub ema100: Vec<f64>,
    pub ema200: Vec<f64>,
    /// First difference of `ema21`.
    pub ema_slope: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_hist: Vec<f64>,
    pub atr: Vec<Option<f64>>,
    pub vwap: Vec<Option<f64>>,
    pub bb_width: Vec<Option<f64>>,
    pub body: Vec<f64>,
    pub range: Vec<f64>,
    pub volume_avg: Vec<Option<f64>>,
    pub fractal_high: Vec<bool>,
    pub fractal_low: Vec<bool>,
    pub session: Vec<Session>,
    pub atr_spike: Vec<Option<bool>>,
    pub volume_spike: Vec<Option<bool>>,
}

impl IndicatorSet {
    /// Compute the full battery over `bars` (oldest first).
    pub fn compute(bars: &[Bar]) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.tick_volume as f64).collect();

        let ema21 = calculate_ema(&closes, 21);
        let macd = calculate_macd(&closes);
        let atr = calculate_atr(bars, ATR_PERIOD);
        let volume_opt: Vec<Option<f64>> = volumes.iter().copied().map(Some).collect();

        Self {
            ema9: calculate_ema(&closes, 9),
            ema_slope: ema_slope(&ema21),
            ema21,
            ema50: calculate_ema(&closes, 50),
            ema100: calculate_ema(&closes, 100),
            ema200: calculate_ema(&closes, 200),
            rsi: calculate_rsi(&closes, RSI_PERIOD),
            macd: macd.macd,
            macd_signal: macd.signal,
            macd_hist: macd.histogram,
            atr_spike: spike_flags(&atr, SPIKE_PERIOD, SPIKE_FACTOR),
            atr,
            vwap: calculate_vwap(bars),
            bb_width: calculate_bandwidth(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD),
            body: body(bars),
            range: range(bars),
            volume_avg: rolling_mean(&volumes, VOLUME_AVG_PERIOD),
            fractal_high: fractal_highs(bars),
            fractal_low: fractal_lows(bars),
            session: bars.iter().map(|b| Session::from_time(&b.time)).collect(),
            volume_spike: spike_flags(&volume_opt, SPIKE_PERIOD, SPIKE_FACTOR),
        }
    }

    /// Number of rows (equals the source series length).
    fn len(&self) -> usize {
        self.ema9.len()
    }

    /// Join bar `i` with its derived values.
    ///
    /// Returns `None` when `i` is out of range or `bars` is not the series this
    /// set was computed from.
    pub fn row(&self, bars: &[Bar], i: usize) -> Option<FeatureRow> {
        if bars.len() != self.len() {
            return None;
        }
        let bar = bars.get(i)?;
        Some(FeatureRow {
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            tick_volume: bar.tick_volume,
            ema9: self.ema9[i],
            ema21: self.ema21[i],
            ema50: self.ema50[i],
            ema100: self.ema100[i],
            ema200: self.ema200[i],
            ema_slope: self.ema_slope[i],
            rsi: self.rsi[i],
            macd: self.macd[i],
            macd_signal: self.macd_signal[i],
            macd_hist: self.macd_hist[i],
            atr: self.atr[i],
            vwap: self.vwap[i],
            bb_width: self.bb_width[i],
            body: self.body[i],
            range: self.range[i],
            volume_avg: self.volume_avg[i],
            fractal_high: self.fractal_high[i],
            fractal_low: self.fractal_low[i],
            session: self.session[i],
            atr_spike: self.atr_spike[i],
            volume_spike: self.volume_spike[i],
        })
    }

    /// The most recent `count` joined rows, oldest first.
    pub fn tail(&self, bars: &[Bar], count: usize) -> Vec<FeatureRow> {
        let start = bars.len().saturating_sub(count);
        (start..bars.len()).filter_map(|i| self.row(bars, i)).collect()
    }
}

/// One bar joined with every derived value at the same index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub tick_volume: u64,
    pub ema9: f64,
    pub ema21: f64,
    pub ema50: f64,
    pub ema100: f64,
    pub ema200: f64,
    pub ema_slope: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub atr: Option<f64>,
    pub vwap: Option<f64>,
    pub bb_width: Option<f64>,
    pub body: f64,
    pub range: f64,
    pub volume_avg: Option<f64>,
    pub fractal_high: bool,
    pub fractal_low: bool,
    pub session: Session,
    pub atr_spike: Option<bool>,
    pub volume_spike: Option<bool>,
}

/// Renders an optional value, spelling out undefined positions.
struct Maybe<T>(Option<T>);

impl<T: std::fmt::Display> std::fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("n/a"),
        }
    }
}

impl std::fmt::Display for FeatureRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{time: {}, open: {}, high: {}, low: {}, close: {}, tick_volume: {}, \
             ema9: {}, ema21: {}, ema50: {}, ema100: {}, ema200: {}, ema_slope: {}, \
             rsi: {}, macd: {}, macd_signal: {}, macd_hist: {}, atr: {}, vwap: {}, \
             bb_width: {}, body: {}, range: {}, volume_avg: {}, fractal_high: {}, \
             fractal_low: {}, session: {}, atr_spike: {}, volume_spike: {}}}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.open,
            self.high,
            self.low,
            self.close,
            self.tick_volume,
            self.ema9,
            self.ema21,
            self.ema50,
            self.ema100,
            self.ema200,
            Maybe(self.ema_slope),
            Maybe(self.rsi),
            self.macd,
            self.macd_signal,
            self.macd_hist,
            Maybe(self.atr),
            Maybe(self.vwap),
            Maybe(self.bb_width),
            self.body,
            self.range,
            Maybe(self.volume_avg),
            self.fractal_high,
            self.fractal_low,
            self.session,
            Maybe(self.atr_spike),
            Maybe(self.volume_spike),
        )
    }
}
