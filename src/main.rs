// =============================================================================
// Aurora Snapshot — Main Entry Point
// =============================================================================
//
// Polls the trading terminal, turns every configured symbol into an indicator
// snapshot and overwrites the report file, then pauses before the next cycle.
// Runs until Ctrl+C; a single failed cycle never stops the loop.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod indicators;
mod market_data;
mod notify;
mod pipeline;
mod pivots;
mod report;
mod runtime_config;
mod sink;
mod snapshot;
mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::{MarketFeed, TerminalClient};
use crate::notify::TelegramNotifier;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Aurora Snapshot — Starting Up                    ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path =
        std::env::var("SNAPSHOT_CONFIG").unwrap_or_else(|_| "snapshot_config.json".into());
    let config = RuntimeConfig::load(&config_path)
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            RuntimeConfig::default()
        })
        .with_env_overrides(|key| std::env::var(key).ok());

    // ── 2. Connect to the terminal ───────────────────────────────────────
    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let terminal = TerminalClient::new(config.bridge_url.clone(), request_timeout)?;
    terminal
        .connect()
        .await
        .with_context(|| format!("terminal initialisation failed at {}", config.bridge_url))?;
    info!(bridge = %config.bridge_url, "Connected to terminal");

    // ── 3. Optional symbol discovery ─────────────────────────────────────
    let config = match terminal.list_symbols().await {
        Ok(available) => config.with_discovered_symbols(&available),
        Err(e) => {
            warn!(error = %e, "Symbol listing failed, skipping optional symbols");
            config
        }
    };
    info!(symbols = ?config.symbols, timeframes = ?config.timeframes, "Configured snapshot universe");

    // ── 4. Notifier ──────────────────────────────────────────────────────
    let notifier = match config.telegram.credentials() {
        Some((token, chat_id)) => Some(TelegramNotifier::new(
            token,
            chat_id,
            config.telegram.char_budget,
            request_timeout,
        )?),
        None => {
            if config.telegram.enabled {
                warn!("Telegram enabled but token or chat id missing, delivery disabled");
            }
            None
        }
    };

    // ── 5. Status API ────────────────────────────────────────────────────
    let state = Arc::new(AppState::new());

    if let Some(bind_addr) = config.api_bind_addr.clone() {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
        let app = api::rest::router(state.clone());
        info!(addr = %bind_addr, "API server listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "API server failed");
            }
        });
    }

    // ── 6. Polling loop ──────────────────────────────────────────────────
    info!(
        path = %config.report_path.display(),
        pause_ms = config.poll_interval_ms,
        "Snapshot loop running. Press Ctrl+C to stop."
    );

    pipeline::run_until_shutdown(
        &terminal,
        &config,
        notifier.as_ref(),
        &state,
        tokio::signal::ctrl_c(),
    )
    .await?;

    warn!("Shutdown signal received — stopping gracefully");
    info!(cycles = state.cycles_completed(), "Aurora Snapshot shut down complete.");
    Ok(())
}
