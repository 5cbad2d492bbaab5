// Alert dispatch behind an abstract async sink.

use crate::config::TelegramCfg;
use crate::error::ScanError;
use crate::types::{Side, Signal};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Notification collaborator: one `notify` per signal. Failures are
/// logged by the caller, never retried within the same scan.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), ScanError>;
}

pub struct TelegramNotifier {
    http: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(cfg: &TelegramCfg) -> Result<Self, ScanError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| ScanError::Notification(err.to_string()))?;
        Ok(Self {
            http,
            bot_token: cfg.bot_token.clone(),
            chat_id: cfg.chat_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), ScanError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let res = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|err| ScanError::Notification(err.to_string()))?;

        if !res.status().is_success() {
            return Err(ScanError::Notification(format!(
                "sendMessage error: {}",
                res.text().await.unwrap_or_default()
            )));
        }
        Ok(())
    }
}

/// Render the human-readable alert for one signal.
pub fn format_alert(signal: &Signal, timeframe: &str, sl_lookback: usize, risk_reward: f64) -> String {
    let emoji = match signal.side {
        Side::Long => "\u{1F7E2}",
        Side::Short => "\u{1F534}",
    };
    format!(
        "{emoji} UT BOT ALERT: {symbol}\n\
         Signal: {side}\n\
         Timeframe: {timeframe}\n\n\
         Entry: {entry:.4}\n\
         Stop Loss: {sl:.4} (Swing {lookback})\n\
         Take Profit: {tp:.4} (1:{rr})",
        symbol = signal.symbol,
        side = signal.side,
        entry = signal.entry_price,
        sl = signal.stop_loss,
        lookback = sl_lookback,
        tp = signal.take_profit,
        rr = risk_reward,
    )
}
