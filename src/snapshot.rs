// =============================================================================
// Snapshot Assembly — one condensed record per symbol
// =============================================================================
//
// Joins each timeframe's bars with their indicator columns, keeps only the
// newest `tail_rows` rows, and attaches pivots from the longest timeframe plus
// the current tick and contract metadata.
//
// Missing data never fails the batch: if any configured timeframe came back
// empty the symbol degrades to a `NoData` placeholder that still carries
// whatever metadata was available.
// =============================================================================

use serde::Serialize;

use crate::indicators::{FeatureRow, IndicatorSet};
use crate::market_data::{Bar, ContractMeta, Tick};
use crate::pivots::PivotSet;
use crate::types::Timeframe;

/// Bars and computed columns for one timeframe of one symbol.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub timeframe: Timeframe,
    pub bars: Vec<Bar>,
    pub indicators: IndicatorSet,
}

impl FrameInput {
    /// Run the indicator battery over `bars`.
    pub fn compute(timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        let indicators = IndicatorSet::compute(&bars);
        Self {
            timeframe,
            bars,
            indicators,
        }
    }
}

/// The trimmed rows of one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRows {
    pub timeframe: Timeframe,
    pub rows: Vec<FeatureRow>,
}

impl FrameRows {
    pub fn last(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }
}

/// Fully populated per-symbol record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub contract: Option<ContractMeta>,
    pub tick: Option<Tick>,
    /// Ordered as configured.
    pub frames: Vec<FrameRows>,
    pub pivot_timeframe: Timeframe,
    pub pivots: PivotSet,
}

impl SymbolSnapshot {
    /// Rows of the finest configured timeframe.
    pub fn shortest_frame(&self) -> Option<&FrameRows> {
        self.frames.iter().min_by_key(|f| f.timeframe.minutes())
    }
}

/// Per-symbol outcome of a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Snapshot {
    Ready(SymbolSnapshot),
    NoData {
        symbol: String,
        contract: Option<ContractMeta>,
        tick: Option<Tick>,
    },
}

impl Snapshot {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Ready(s) => &s.symbol,
            Self::NoData { symbol, .. } => symbol,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Longest timeframe among `frames`, the pivot reference.
pub fn pivot_timeframe(frames: &[FrameInput]) -> Option<Timeframe> {
    frames.iter().map(|f| f.timeframe).max_by_key(Timeframe::minutes)
}

/// Assemble the snapshot for `symbol`.
///
/// `pivots` must come from the series of [`pivot_timeframe`].  An empty
/// `frames` slice, or any frame without bars, yields [`Snapshot::NoData`].
pub fn assemble(
    symbol: &str,
    frames: &[FrameInput],
    contract: Option<ContractMeta>,
    tick: Option<Tick>,
    pivots: PivotSet,
    tail_rows: usize,
) -> Snapshot {
    let pivot_tf = match pivot_timeframe(frames) {
        Some(tf) if frames.iter().all(|f| !f.bars.is_empty()) => tf,
        _ => {
            return Snapshot::NoData {
                symbol: symbol.to_string(),
                contract,
                tick,
            }
        }
    };

    let frames = frames
        .iter()
        .map(|f| FrameRows {
            timeframe: f.timeframe,
            rows: f.indicators.tail(&f.bars, tail_rows),
        })
        .collect();

    Snapshot::Ready(SymbolSnapshot {
        symbol: symbol.to_string(),
        contract,
        tick,
        frames,
        pivot_timeframe: pivot_tf,
        pivots,
    })
}
