// Binance futures REST access behind the MarketData seam.

use crate::config::BinanceCfg;
use crate::error::ScanError;
use crate::types::{Candle, TickerStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Market data collaborator. Both calls may block on the network and
/// can fail transiently; the orchestrator isolates failures per symbol.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// 24h ticker snapshot for every listed symbol.
    async fn fetch_tickers(&self) -> Result<Vec<TickerStats>, ScanError>;

    /// Closed candles for one symbol, oldest first, at most `limit`.
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, ScanError>;
}

pub struct BinanceFutures {
    http: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct Ticker24hr {
    symbol: String,
    #[serde(rename = "priceChangePercent")]
    price_change_percent: String,
}

impl BinanceFutures {
    pub fn new(cfg: &BinanceCfg) -> Result<Self, ScanError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        let base_url = Url::parse(&cfg.futures_base)
            .map_err(|err| ScanError::DataFetch(format!("invalid futures base url: {err}")))?;
        Ok(Self { http, base_url })
    }
}

fn ts_ms_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

#[async_trait]
impl MarketData for BinanceFutures {
    async fn fetch_tickers(&self) -> Result<Vec<TickerStats>, ScanError> {
        let url = self
            .base_url
            .join("/fapi/v1/ticker/24hr")
            .map_err(|err| ScanError::DataFetch(err.to_string()))?;

        let res = self.http.get(url).send().await?;
        if !res.status().is_success() {
            return Err(ScanError::DataFetch(format!(
                "ticker/24hr error: {}",
                res.text().await.unwrap_or_default()
            )));
        }

        let tickers: Vec<Ticker24hr> = res.json().await?;
        Ok(tickers
            .into_iter()
            .map(|t| TickerStats {
                symbol: t.symbol,
                // unparsable change ranks with the sentinel, not dropped
                price_change_pct: t.price_change_percent.parse::<f64>().ok(),
            })
            .collect())
    }

    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, ScanError> {
        let mut url = self
            .base_url
            .join("/fapi/v1/klines")
            .map_err(|err| ScanError::DataFetch(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol)
            .append_pair("interval", interval)
            .append_pair("limit", &limit.to_string());

        let res = self.http.get(url).send().await?;
        if !res.status().is_success() {
            return Err(ScanError::DataFetch(format!(
                "klines error for {symbol}: {}",
                res.text().await.unwrap_or_default()
            )));
        }

        let raw: Vec<serde_json::Value> = res.json().await?;
        let candles = raw
            .into_iter()
            .filter_map(|row| {
                let row = row.as_array()?;
                if row.len() < 7 {
                    return None;
                }
                Some(Candle {
                    open_time: ts_ms_to_utc(row[0].as_i64()?)?,
                    close_time: ts_ms_to_utc(row[6].as_i64()?)?,
                    open: row[1].as_str()?.parse().ok()?,
                    high: row[2].as_str()?.parse().ok()?,
                    low: row[3].as_str()?.parse().ok()?,
                    close: row[4].as_str()?.parse().ok()?,
                    volume: row[5].as_str()?.parse().ok()?,
                })
            })
            .collect();

        Ok(candles)
    }
}
