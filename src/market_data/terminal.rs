// =============================================================================
// Terminal Bridge Client — HTTP/JSON access to the trading terminal
// =============================================================================
//
// The terminal itself only exposes a native API, so a small bridge process
// next to it republishes rates, symbol info and ticks over HTTP:
//
//   GET /health
//   GET /symbols                                -> ["XAUUSD", ...]
//   GET /rates?symbol=S&timeframe=M1&count=500  -> [{time, open, high, low, close, tick_volume}]
//   GET /symbol_info?symbol=S                   -> {spread, bid, ask, ...} | null
//   GET /tick?symbol=S                          -> {time, bid, ask, last, volume} | null
//
// `404` and a JSON `null` body both mean "absent" for the optional lookups.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::{Bar, ContractMeta, Tick};
use crate::types::Timeframe;

/// Source of raw market data for the snapshot pipeline.
///
/// Empty bar vectors and `None` metadata are valid answers; the pipeline
/// degrades the affected symbol instead of aborting.
pub trait MarketFeed {
    /// Verify that the terminal is reachable.
    fn connect(&self) -> impl Future<Output = Result<()>> + Send;

    /// Every symbol name the terminal knows about.
    fn list_symbols(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// The most recent `count` bars for `symbol` at `timeframe`, oldest first.
    fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Bar>>> + Send;

    fn fetch_contract(&self, symbol: &str) -> impl Future<Output = Result<Option<ContractMeta>>> + Send;

    fn fetch_tick(&self, symbol: &str) -> impl Future<Output = Result<Option<Tick>>> + Send;
}

/// Wire shape of one element of `/rates`.
#[derive(Debug, Deserialize)]
struct RawRate {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    tick_volume: u64,
}

/// HTTP client for the terminal bridge.
#[derive(Clone)]
pub struct TerminalClient {
    base_url: String,
    client: reqwest::Client,
}

impl TerminalClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // The bridge runs beside the terminal; never route it through a proxy.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "TerminalClient initialised");
        Ok(Self { base_url, client })
    }

    /// GET `path` and decode the body, mapping `404`/`null` to `None`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {path} request failed"))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("bridge GET {} returned {}: {}", path, status, detail);
        }

        resp.json::<Option<T>>()
            .await
            .with_context(|| format!("failed to parse {path} response"))
    }
}

impl MarketFeed for TerminalClient {
    #[instrument(skip(self), name = "terminal::connect")]
    async fn connect(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("terminal bridge is unreachable")?;

        if !resp.status().is_success() {
            anyhow::bail!("terminal bridge health check returned {}", resp.status());
        }
        Ok(())
    }

    #[instrument(skip(self), name = "terminal::list_symbols")]
    async fn list_symbols(&self) -> Result<Vec<String>> {
        let symbols: Option<Vec<String>> = self.get_optional("/symbols", &[]).await?;
        Ok(symbols.unwrap_or_default())
    }

    #[instrument(skip(self), name = "terminal::fetch_bars")]
    async fn fetch_bars(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Result<Vec<Bar>> {
        let query = [
            ("symbol", symbol.to_string()),
            ("timeframe", timeframe.label().to_string()),
            ("count", count.to_string()),
        ];
        let raw: Vec<RawRate> = self.get_optional("/rates", &query).await?.unwrap_or_default();

        let mut bars = Vec::with_capacity(raw.len());
        for rate in raw {
            let Some(time) = Utc.timestamp_opt(rate.time, 0).single() else {
                warn!(symbol, time = rate.time, "skipping rate with invalid timestamp");
                continue;
            };
            bars.push(Bar::new(time, rate.open, rate.high, rate.low, rate.close, rate.tick_volume));
        }
        bars.sort_by_key(|b| b.time);
        if bars.len() > count {
            bars.drain(..bars.len() - count);
        }

        debug!(symbol, timeframe = %timeframe, count = bars.len(), "rates fetched");
        Ok(bars)
    }

    #[instrument(skip(self), name = "terminal::fetch_contract")]
    async fn fetch_contract(&self, symbol: &str) -> Result<Option<ContractMeta>> {
        self.get_optional("/symbol_info", &[("symbol", symbol.to_string())]).await
    }

    #[instrument(skip(self), name = "terminal::fetch_tick")]
    async fn fetch_tick(&self, symbol: &str) -> Result<Option<Tick>> {
        self.get_optional("/tick", &[("symbol", symbol.to_string())]).await
    }
}

impl std::fmt::Debug for TerminalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = TerminalClient::new("http://127.0.0.1:8228/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8228");
        assert!(format!("{client:?}").contains("127.0.0.1:8228"));
    }

    #[test]
    fn raw_rate_defaults_missing_volume() {
        let raw: Vec<RawRate> = serde_json::from_str(
            r#"[{ "time": 1700000000, "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5 }]"#,
        )
        .unwrap();
        assert_eq!(raw[0].tick_volume, 0);
        assert_eq!(raw[0].time, 1_700_000_000);
    }

    // -------------------------------------------------------------------------
    // Stub bridge served on an ephemeral local port
    // -------------------------------------------------------------------------

    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    fn rate(time: i64, close: f64) -> serde_json::Value {
        serde_json::json!({
            "time": time, "open": close, "high": close + 1.0,
            "low": close - 1.0, "close": close, "tick_volume": 7
        })
    }

    async fn rates(Query(q): Query<HashMap<String, String>>) -> Response {
        match q.get("symbol").map(String::as_str) {
            Some("XAUUSD") => Json(serde_json::json!([
                rate(1_700_000_300, 3.0),
                rate(1_700_000_100, 1.0),
                rate(i64::MAX, 99.0),
                rate(1_700_000_200, 2.0),
                rate(1_700_000_000, 0.5),
            ]))
            .into_response(),
            Some("BROKEN") => (AxumStatus::INTERNAL_SERVER_ERROR, "terminal not logged in").into_response(),
            _ => AxumStatus::NOT_FOUND.into_response(),
        }
    }

    async fn symbol_info(Query(q): Query<HashMap<String, String>>) -> Response {
        match q.get("symbol").map(String::as_str) {
            Some("XAUUSD") => Json(serde_json::json!({ "spread": 18, "bid": 2350.1, "ask": 2350.28 })).into_response(),
            _ => Json(serde_json::Value::Null).into_response(),
        }
    }

    async fn stub_bridge() -> TerminalClient {
        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/symbols", get(|| async { Json(serde_json::json!(["XAUUSD", "US10Y"])) }))
            .route("/rates", get(rates))
            .route("/symbol_info", get(symbol_info));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        TerminalClient::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn connect_and_list_symbols() {
        let client = stub_bridge().await;
        client.connect().await.unwrap();
        assert_eq!(client.list_symbols().await.unwrap(), vec!["XAUUSD", "US10Y"]);
    }

    #[tokio::test]
    async fn rates_are_sorted_trimmed_and_skip_invalid_times() {
        let client = stub_bridge().await;
        let bars = client.fetch_bars("XAUUSD", Timeframe::M1, 3).await.unwrap();
        let times: Vec<i64> = bars.iter().map(|b| b.time.timestamp()).collect();
        assert_eq!(times, vec![1_700_000_100, 1_700_000_200, 1_700_000_300]);
        assert_eq!(bars[2].close, 3.0);
        assert_eq!(bars[0].tick_volume, 7);
    }

    #[tokio::test]
    async fn not_found_means_no_bars() {
        let client = stub_bridge().await;
        assert!(client.fetch_bars("EURUSD", Timeframe::M1, 10).await.unwrap().is_empty());
        // `/tick` is not routed at all on the stub.
        assert!(client.fetch_tick("XAUUSD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn null_payload_is_absent() {
        let client = stub_bridge().await;
        assert!(client.fetch_contract("DXY").await.unwrap().is_none());
        let meta = client.fetch_contract("XAUUSD").await.unwrap().unwrap();
        assert_eq!(meta.spread, 18);
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_text_body() {
        let client = stub_bridge().await;
        let err = client.fetch_bars("BROKEN", Timeframe::M1, 10).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("500"), "{msg}");
        assert!(msg.contains("terminal not logged in"), "{msg}");
    }
}
