// =============================================================================
// Runtime Configuration — snapshot engine settings
// =============================================================================
//
// Loaded once at startup from a JSON file, then overlaid with environment
// variables and the optional-symbol discovery result.  After that the value
// is frozen: each polling cycle borrows it and nothing in the pipeline
// mutates it.
//
// All fields carry `#[serde(default)]` so that adding new fields never breaks
// loading an older config file.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::Timeframe;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec!["XAUUSD".to_string(), "DXY".to_string(), "SILVER".to_string()]
}

fn default_optional_symbol_markers() -> Vec<String> {
    vec!["10Y".to_string(), "TNOTE".to_string(), "ZNU".to_string()]
}

fn default_timeframes() -> Vec<Timeframe> {
    vec![Timeframe::M1, Timeframe::M15, Timeframe::M30]
}

fn default_bar_count() -> usize {
    500
}

fn default_tail_rows() -> usize {
    10
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_report_path() -> PathBuf {
    PathBuf::from("gold_snapshot.txt")
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:8228".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_char_budget() -> usize {
    4096
}

// =============================================================================
// TelegramConfig
// =============================================================================

/// Chat delivery settings.  Credentials normally come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Send each report when credentials are present.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing)]
    pub bot_token: Option<String>,

    #[serde(default)]
    pub chat_id: Option<String>,

    /// Maximum characters per message (Telegram caps text at 4096).
    #[serde(default = "default_char_budget")]
    pub char_budget: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: None,
            chat_id: None,
            char_budget: default_char_budget(),
        }
    }
}

impl TelegramConfig {
    /// `(token, chat_id)` when delivery is switched on and fully configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if !self.enabled {
            return None;
        }
        let token = self.bot_token.as_deref().filter(|t| !t.is_empty())?;
        let chat = self.chat_id.as_deref().filter(|c| !c.is_empty())?;
        Some((token, chat))
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the snapshot engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Universe ------------------------------------------------------------

    /// Symbols snapshotted every cycle, in report order.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Substrings identifying an optional bond-future symbol to append when
    /// the terminal offers one.
    #[serde(default = "default_optional_symbol_markers")]
    pub optional_symbol_markers: Vec<String>,

    /// Timeframes fetched per symbol.  The longest one feeds the pivots, the
    /// shortest one stamps the report header.
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<Timeframe>,

    // --- Window sizes --------------------------------------------------------

    /// Bars requested per (symbol, timeframe).
    #[serde(default = "default_bar_count")]
    pub bar_count: usize,

    /// Joined rows kept per timeframe in a snapshot.
    #[serde(default = "default_tail_rows")]
    pub tail_rows: usize,

    // --- Loop & outputs ------------------------------------------------------

    /// Pause between the end of one cycle and the start of the next.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Where the latest report is written (overwritten each cycle).
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Base URL of the terminal bridge.
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Address for the read-only status API; disabled when absent.
    #[serde(default)]
    pub api_bind_addr: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            optional_symbol_markers: default_optional_symbol_markers(),
            timeframes: default_timeframes(),
            bar_count: default_bar_count(),
            tail_rows: default_tail_rows(),
            poll_interval_ms: default_poll_interval_ms(),
            report_path: default_report_path(),
            bridge_url: default_bridge_url(),
            request_timeout_secs: default_request_timeout_secs(),
            telegram: TelegramConfig::default(),
            api_bind_addr: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            timeframes = ?config.timeframes,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Overlay settings from environment variables, given as a lookup so
    /// tests do not touch the process environment.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(syms) = var("SNAPSHOT_SYMBOLS") {
            let symbols: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !symbols.is_empty() {
                self.symbols = symbols;
            }
        }
        if let Some(url) = var("TERMINAL_BRIDGE_URL") {
            self.bridge_url = url;
        }
        if let Some(addr) = var("SNAPSHOT_BIND_ADDR") {
            self.api_bind_addr = Some(addr);
        }
        if let Some(token) = var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
        if let Some(chat) = var("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = Some(chat);
        }
        self
    }

    /// Append the first `available` symbol that matches an optional marker
    /// and is not already configured.  At most one symbol is added.
    pub fn with_discovered_symbols(mut self, available: &[String]) -> Self {
        let found = available.iter().find(|name| {
            !self.symbols.contains(name)
                && self
                    .optional_symbol_markers
                    .iter()
                    .any(|marker| name.contains(marker.as_str()))
        });

        match found {
            Some(name) => {
                info!(symbol = %name, "detected and added optional bond symbol");
                self.symbols.push(name.clone());
            }
            None => info!("no optional bond symbol found, skipping bond alignment"),
        }
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.symbols, vec!["XAUUSD", "DXY", "SILVER"]);
        assert_eq!(cfg.timeframes, vec![Timeframe::M1, Timeframe::M15, Timeframe::M30]);
        assert_eq!(cfg.bar_count, 500);
        assert_eq!(cfg.tail_rows, 10);
        assert_eq!(cfg.telegram.char_budget, 4096);
        assert!(!cfg.telegram.enabled);
        assert!(cfg.api_bind_addr.is_none());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.symbols.len(), 3);
        assert_eq!(cfg.poll_interval_ms, 1000);
        assert_eq!(cfg.report_path, PathBuf::from("gold_snapshot.txt"));
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "timeframes": ["M5", "H1"], "telegram": { "enabled": true } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.timeframes, vec![Timeframe::M5, Timeframe::H1]);
        assert!(cfg.telegram.enabled);
        assert_eq!(cfg.telegram.char_budget, 4096);
        assert_eq!(cfg.bar_count, 500);
    }

    #[test]
    fn token_is_never_serialised() {
        let mut cfg = RuntimeConfig::default();
        cfg.telegram.bot_token = Some("123:SECRET".into());
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("SECRET"));
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            ("SNAPSHOT_SYMBOLS", " xauusd, eurusd ,,"),
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "c"),
        ]
        .into_iter()
        .collect();
        let cfg = RuntimeConfig::default().with_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.symbols, vec!["XAUUSD", "EURUSD"]);
        assert_eq!(cfg.bridge_url, "http://127.0.0.1:8228");
        assert_eq!(cfg.telegram.credentials(), None);

        let mut enabled = cfg.clone();
        enabled.telegram.enabled = true;
        assert_eq!(enabled.telegram.credentials(), Some(("t", "c")));
    }

    #[test]
    fn discovery_adds_first_matching_symbol_once() {
        let available: Vec<String> = ["XAUUSD", "EURUSD", "US10Y", "TNOTE.fut", "SILVER"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cfg = RuntimeConfig::default().with_discovered_symbols(&available);
        assert_eq!(cfg.symbols, vec!["XAUUSD", "DXY", "SILVER", "US10Y"]);

        let again = cfg.clone().with_discovered_symbols(&available);
        assert_eq!(again.symbols, vec!["XAUUSD", "DXY", "SILVER", "US10Y", "TNOTE.fut"]);
    }

    #[test]
    fn discovery_without_match_keeps_symbols() {
        let available = vec!["XAUUSD".to_string(), "EURUSD".to_string()];
        let cfg = RuntimeConfig::default().with_discovered_symbols(&available);
        assert_eq!(cfg.symbols, default_symbols());
    }
}
