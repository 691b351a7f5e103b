pub mod bar;
pub mod quote;
pub mod terminal;

// Re-export the core records for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar::{Bar, Series, SeriesKey};
pub use quote::{ContractMeta, Tick};
pub use terminal::{MarketFeed, TerminalClient};
