// Configuration structures and loading logic

use anyhow::{anyhow, Result};
use serde::Deserialize;

// ============================================================================
// Configuration Structures
// ============================================================================

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub binance: BinanceCfg,
    #[serde(default)]
    pub telegram: TelegramCfg,
    #[serde(default)]
    pub scanner: ScannerCfg,
    #[serde(default)]
    pub strategy: StrategyCfg,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BinanceCfg {
    #[serde(default = "default_futures_base")]
    pub futures_base: String,
    /// Request timeout for REST calls, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramCfg {
    /// Bot token; falls back to TELEGRAM_BOT_TOKEN env var when empty
    #[serde(default)]
    pub bot_token: String,
    /// Chat or channel id; falls back to TELEGRAM_CHAT_ID env var when empty
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScannerCfg {
    /// Candle timeframe (Binance interval string, e.g. "15m")
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    /// Candles fetched per symbol; also the required scan window length
    #[serde(default = "default_candle_limit")]
    pub candle_limit: u32,
    /// How many top gainers to scan per pass
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Settlement asset filter for candidate symbols
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    /// Seconds between scan passes
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,
    /// Pause between symbols to stay under exchange rate limits
    #[serde(default = "default_symbol_pause_ms")]
    pub symbol_pause_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StrategyCfg {
    /// ATR period for the volatility estimate
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,
    /// Trailing stop distance multiplier (UT Bot "key value")
    #[serde(default = "default_key_value")]
    pub key_value: f64,
    /// Swing low/high lookback candles for stop-loss placement
    #[serde(default = "default_sl_lookback")]
    pub sl_lookback: usize,
    /// Take-profit distance as a multiple of risked distance
    #[serde(default = "default_risk_reward")]
    pub risk_reward: f64,
}

impl Default for BinanceCfg {
    fn default() -> Self {
        Self {
            futures_base: default_futures_base(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Default for ScannerCfg {
    fn default() -> Self {
        Self {
            timeframe: default_timeframe(),
            candle_limit: default_candle_limit(),
            top_n: default_top_n(),
            quote_asset: default_quote_asset(),
            scan_interval_secs: default_scan_interval_secs(),
            symbol_pause_ms: default_symbol_pause_ms(),
        }
    }
}

impl Default for StrategyCfg {
    fn default() -> Self {
        Self {
            atr_period: default_atr_period(),
            key_value: default_key_value(),
            sl_lookback: default_sl_lookback(),
            risk_reward: default_risk_reward(),
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

fn default_futures_base() -> String {
    "https://fapi.binance.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_timeframe() -> String {
    "15m".to_string()
}

fn default_candle_limit() -> u32 {
    100
}

fn default_top_n() -> usize {
    25
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

fn default_scan_interval_secs() -> u64 {
    900 // one 15m candle
}

fn default_symbol_pause_ms() -> u64 {
    100
}

fn default_atr_period() -> usize {
    10
}

fn default_key_value() -> f64 {
    2.0
}

fn default_sl_lookback() -> usize {
    10
}

fn default_risk_reward() -> f64 {
    2.0
}

// ============================================================================
// Configuration Loading
// ============================================================================

/// Load application configuration from a YAML file.
///
/// The file path can be given via `--config <path>`, otherwise
/// `./config.yaml` is used. A missing file yields the built-in
/// defaults so the scanner can run with nothing but env credentials.
pub fn load_config() -> Result<AppCfg> {
    let args: Vec<String> = std::env::args().collect();
    let path = args
        .windows(2)
        .find_map(|w| {
            if w[0] == "--config" {
                Some(w[1].clone())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "./config.yaml".to_string());

    let mut cfg: AppCfg = match std::fs::read_to_string(&path) {
        Ok(content) => serde_yaml::from_str(&content)?,
        Err(_) => AppCfg::default(),
    };

    // Credentials: config file first, env var fallback
    if cfg.telegram.bot_token.trim().is_empty() {
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            cfg.telegram.bot_token = token;
        }
    }
    if cfg.telegram.chat_id.trim().is_empty() {
        if let Ok(chat_id) = std::env::var("TELEGRAM_CHAT_ID") {
            cfg.telegram.chat_id = chat_id;
        }
    }

    validate_config(&cfg)?;
    Ok(cfg)
}

/// Validate configuration values
pub fn validate_config(cfg: &AppCfg) -> Result<()> {
    if cfg.scanner.timeframe.trim().is_empty() {
        return Err(anyhow!("scanner.timeframe must not be empty"));
    }
    if cfg.scanner.top_n == 0 {
        return Err(anyhow!("scanner.top_n must be greater than 0"));
    }
    if cfg.strategy.atr_period == 0 {
        return Err(anyhow!("strategy.atr_period must be greater than 0"));
    }
    // The detector inspects the last two candles, both of which need a
    // defined ATR. Anything shorter can never produce a signal.
    let min_window = cfg.strategy.atr_period as u32 + 1;
    if cfg.scanner.candle_limit < min_window {
        return Err(anyhow!(
            "scanner.candle_limit ({}) must be at least atr_period + 1 ({})",
            cfg.scanner.candle_limit,
            min_window
        ));
    }
    if cfg.strategy.sl_lookback == 0 {
        return Err(anyhow!("strategy.sl_lookback must be greater than 0"));
    }
    if cfg.strategy.key_value <= 0.0 {
        return Err(anyhow!("strategy.key_value must be positive"));
    }
    if cfg.strategy.risk_reward <= 0.0 {
        return Err(anyhow!("strategy.risk_reward must be positive"));
    }
    if cfg.telegram.bot_token.trim().is_empty() {
        return Err(anyhow!(
            "telegram.bot_token is required; set it in config.yaml or TELEGRAM_BOT_TOKEN"
        ));
    }
    if cfg.telegram.chat_id.trim().is_empty() {
        return Err(anyhow!(
            "telegram.chat_id is required; set it in config.yaml or TELEGRAM_CHAT_ID"
        ));
    }
    Ok(())
}
