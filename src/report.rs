// =============================================================================
// Report Formatter — snapshots to one text block
// =============================================================================
//
// Layout per symbol:
//
//   [GPT SCALPING SNAPSHOT – SYMBOL – <last bar of finest timeframe>] (<UTC> / <UK>)
//   Price: <bid> | Spread: <points>
//   [M1 Data]        <last joined row>     (one block per configured timeframe)
//   [Pivots]         <levels>
//   [Tick Info]      <tick>
//   [Meta Summary]   <bid/ask/volume/session/swaps>
//
// Symbol blocks are separated by two blank lines and followed by the fixed
// ACTION PROMPT footer.  The wall-clock header stamps are taken at render
// time, not capture time.
// =============================================================================

use chrono::{DateTime, Duration, Utc};

use crate::snapshot::{Snapshot, SymbolSnapshot};

/// Instruction block appended to every report, byte-identical across runs.
pub const ACTION_PROMPT: &str = "\
ACTION PROMPT TO GPT:
Run Line Theory 15 and 30 full MA stack checks. Validate pink/yellow/cyan relationships and white MA slope for macro trend alignment.
Evaluate Method 4.4 breakout quality: body ratio, volume spike, ATR confirmation, breakout candle location, retest within 1–4 bars, SL/TP RR range.
Check RSI(5) M1/M15/M30, MACD crossovers, and BB width status. Confirm squeeze, expansion, or climax.
Apply Validity Checker: session tag, VWAP alignment, ±45min news filter, zone retest fatigue, confidence %, time-decayed risk.
If DXY/Silver/US10Y data is missing or diverges → reduce confidence.
Return response in this exact format:
- SIGNAL: BUY / SELL / AVOID
- ENTRY: price or range
- SL / TP1 / TP2
- CONFIDENCE: %
- RISK PROFILE: now/in_5/in_15
- TREND CONTEXT
- MOMENTUM CONTEXT
- STRUCTURE CONTEXT
- INTERMARKET CONTEXT";

/// Offset of the second header clock.
const UK_OFFSET_HOURS: i64 = 1;

/// Render `snapshots` with the current wall clock.
pub fn render(snapshots: &[Snapshot]) -> String {
    render_at(snapshots, Utc::now())
}

/// Render `snapshots` with header clocks taken from `now`.
pub fn render_at(snapshots: &[Snapshot], now: DateTime<Utc>) -> String {
    let now_utc = now.format("%Y-%m-%d %H:%M UTC").to_string();
    let now_uk = (now + Duration::hours(UK_OFFSET_HOURS))
        .format("%Y-%m-%d %H:%M UK")
        .to_string();

    let mut lines: Vec<String> = Vec::new();
    for snapshot in snapshots {
        match snapshot {
            Snapshot::NoData { symbol, .. } => {
                lines.push(format!("[WARNING] No data for {symbol}"));
            }
            Snapshot::Ready(snap) => render_symbol(&mut lines, snap, &now_utc, &now_uk),
        }
    }

    lines.push(ACTION_PROMPT.to_string());
    lines.join("\n")
}

fn render_symbol(lines: &mut Vec<String>, snap: &SymbolSnapshot, now_utc: &str, now_uk: &str) {
    let last_bar = snap
        .shortest_frame()
        .and_then(|f| f.last())
        .map_or_else(|| "n/a".to_string(), |r| r.time.format("%Y-%m-%d %H:%M:%S").to_string());
    let price = snap.tick.as_ref().map(|t| t.bid);
    let contract = snap.contract.as_ref();

    lines.push(format!(
        "[GPT SCALPING SNAPSHOT – {} – {}] ({} / {})",
        snap.symbol, last_bar, now_utc, now_uk
    ));
    lines.push(format!(
        "Price: {} | Spread: {}",
        opt(price),
        opt(contract.map(|c| c.spread))
    ));

    for frame in &snap.frames {
        lines.push(format!("[{} Data]", frame.timeframe));
        lines.push(opt(frame.last()));
    }

    lines.push("[Pivots]".to_string());
    lines.push(snap.pivots.to_string());

    lines.push("[Tick Info]".to_string());
    lines.push(opt(snap.tick.as_ref()));

    lines.push("[Meta Summary]".to_string());
    lines.push(format!(
        "{{bid: {}, ask: {}, volume: {}, session_open: {}, session_close: {}, swap_long: {}, swap_short: {}}}",
        opt(price),
        opt(contract.map(|c| c.ask)),
        opt(contract.map(|c| c.volume)),
        opt(contract.map(|c| c.session_open)),
        opt(contract.map(|c| c.session_close)),
        opt(contract.map(|c| c.swap_long)),
        opt(contract.map(|c| c.swap_short)),
    ));
    lines.push("\n".to_string());
}

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}
