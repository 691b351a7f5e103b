// =============================================================================
// Telegram Notifier — best-effort delivery of the report text
// =============================================================================
//
// SECURITY: the bot token is part of the endpoint URL; it is never logged and
// is redacted from the Debug output.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// `sendMessage` body.  No `parse_mode`: the report is plain text and its
/// snake_case field names would be read as Markdown emphasis.
#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Posts messages to one Telegram chat through the Bot API.
#[derive(Clone)]
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    char_budget: usize,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        char_budget: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            token: token.into(),
            chat_id: chat_id.into(),
            char_budget,
            base_url: TELEGRAM_API.to_string(),
            client,
        })
    }

    /// POST /bot<token>/sendMessage with `text` cut to the character budget.
    #[instrument(skip(self, text), name = "telegram::send")]
    pub async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let body = self.message(text);

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("POST sendMessage request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram sendMessage returned {}: {}", status, detail);
        }

        debug!(chars = body.text.chars().count(), "report delivered");
        Ok(())
    }

    fn message<'a>(&'a self, text: &'a str) -> SendMessage<'a> {
        SendMessage {
            chat_id: &self.chat_id,
            text: truncate_chars(text, self.char_budget),
        }
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("char_budget", &self.char_budget)
            .finish()
    }
}

/// The longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_chars("abc", 4096), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        // '–' and '±' are multi-byte in UTF-8.
        let text = "a–b±c";
        assert_eq!(truncate_chars(text, 2), "a–");
        assert_eq!(truncate_chars(text, 4), "a–b±");
        assert_eq!(truncate_chars(text, 0), "");
    }

    #[test]
    fn message_is_plain_text_within_budget() {
        let n = TelegramNotifier::new("t", "42", 12, Duration::from_secs(1)).unwrap();
        let json = serde_json::to_value(n.message("{tick_volume: 5, ema_slope: n/a}")).unwrap();
        assert_eq!(json, serde_json::json!({ "chat_id": "42", "text": "{tick_volume" }));
        assert!(json.get("parse_mode").is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let n = TelegramNotifier::new("123:SECRET", "42", 4096, Duration::from_secs(1)).unwrap();
        let dbg = format!("{n:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("<redacted>"));
    }
}
