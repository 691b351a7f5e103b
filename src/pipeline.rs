// =============================================================================
// Snapshot Pipeline — one polling cycle
// =============================================================================
//
// For every configured symbol, in order:
//   1. fetch bars for each timeframe (failures degrade to an empty series)
//   2. compute indicators per timeframe
//   3. pivots from the longest timeframe
//   4. contract metadata and latest tick (failures degrade to `None`)
//   5. assemble the snapshot
//
// Then render one report, persist it, optionally forward it to Telegram and
// publish the cycle to the shared state.  Nothing inside a cycle is fatal.
//
// `run_until_shutdown` repeats cycles with a fixed pause after each one.  The
// shutdown future is created once, so a signal that lands mid-cycle is still
// seen when the cycle finishes.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};

use crate::app_state::{AppState, PublishedCycle};
use crate::market_data::{MarketFeed, Series, SeriesKey};
use crate::notify::TelegramNotifier;
use crate::pivots::{calculate_pivots, PivotSet};
use crate::report;
use crate::runtime_config::RuntimeConfig;
use crate::sink::persist_report;
use crate::snapshot::{assemble, pivot_timeframe, FrameInput, Snapshot};

/// Build the snapshot of one symbol from `feed`.
pub async fn build_symbol_snapshot<F: MarketFeed>(
    feed: &F,
    symbol: &str,
    config: &RuntimeConfig,
) -> Snapshot {
    let mut frames = Vec::with_capacity(config.timeframes.len());
    for &timeframe in &config.timeframes {
        let key = SeriesKey {
            symbol: symbol.to_string(),
            timeframe,
        };
        let bars = match feed.fetch_bars(symbol, timeframe, config.bar_count).await {
            Ok(bars) => bars,
            Err(e) => {
                warn!(series = %key, error = %e, "failed to fetch bars");
                Vec::new()
            }
        };
        let series = Series::new(key, bars, config.bar_count);
        if series.is_empty() {
            warn!(series = %series.key, "no bars returned");
        }
        frames.push(FrameInput::compute(timeframe, series.into_bars()));
    }

    let pivots = pivot_timeframe(&frames)
        .and_then(|tf| frames.iter().find(|f| f.timeframe == tf))
        .map_or_else(PivotSet::default, |f| calculate_pivots(&f.bars));

    let contract = feed.fetch_contract(symbol).await.unwrap_or_else(|e| {
        warn!(symbol, error = %e, "failed to fetch contract metadata");
        None
    });
    let tick = feed.fetch_tick(symbol).await.unwrap_or_else(|e| {
        warn!(symbol, error = %e, "failed to fetch latest tick");
        None
    });

    assemble(symbol, &frames, contract, tick, pivots, config.tail_rows)
}

/// Run one full cycle and return the rendered report.
pub async fn run_cycle<F: MarketFeed>(
    feed: &F,
    config: &RuntimeConfig,
    notifier: Option<&TelegramNotifier>,
    state: &AppState,
) -> String {
    let cycle_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("cycle", id = %cycle_id);

    async {
        let mut snapshots = Vec::with_capacity(config.symbols.len());
        for symbol in &config.symbols {
            let snapshot = build_symbol_snapshot(feed, symbol, config).await;
            if !snapshot.is_ready() {
                warn!(symbol = snapshot.symbol(), "no data, placeholder emitted");
            }
            snapshots.push(snapshot);
        }

        let text = report::render(&snapshots);

        if let Err(e) = persist_report(&config.report_path, &text) {
            warn!(error = %e, "failed to persist report");
        }

        if let Some(notifier) = notifier {
            if let Err(e) = notifier.send(&text).await {
                warn!(error = %e, "failed to deliver report to Telegram");
            }
        }

        let ready = snapshots.iter().filter(|s| s.is_ready()).count();
        let cycles = state.publish(PublishedCycle {
            cycle_id: cycle_id.clone(),
            completed_at: Utc::now(),
            report: text.clone(),
            snapshots,
        });

        info!(
            symbols = config.symbols.len(),
            ready,
            cycles,
            path = %config.report_path.display(),
            "snapshot cycle complete"
        );
        text
    }
    .instrument(span)
    .await
}

/// Run cycles until `shutdown` resolves, pausing `poll_interval_ms` after
/// each one.  A cycle in progress always completes before the loop exits.
pub async fn run_until_shutdown<F, S>(
    feed: &F,
    config: &RuntimeConfig,
    notifier: Option<&TelegramNotifier>,
    state: &AppState,
    shutdown: S,
) -> std::io::Result<()>
where
    F: MarketFeed,
    S: Future<Output = std::io::Result<()>>,
{
    let pause = Duration::from_millis(config.poll_interval_ms);
    tokio::pin!(shutdown);

    loop {
        run_cycle(feed, config, notifier, state).await;

        tokio::select! {
            biased;
            res = &mut shutdown => return res,
            _ = tokio::time::sleep(pause) => {}
        }
    }
}
