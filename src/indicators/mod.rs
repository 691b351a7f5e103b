// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the feature battery computed for
// every (symbol, timeframe) series.  Every series function returns a vector
// aligned index-for-index with its input; positions without enough history
// hold `None` so callers are forced to handle insufficient-data and
// numerical-edge-case scenarios.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod feature_set;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod spikes;
pub mod structure;
pub mod vwap;

pub use feature_set::{FeatureRow, IndicatorSet};
