// Candidate ranking and the per-scan orchestration loop.

use crate::config::AppCfg;
use crate::connection::MarketData;
use crate::error::ScanError;
use crate::notify::{format_alert, Notifier};
use crate::strategy;
use crate::types::{Signal, TickerStats};
use tracing::{info, warn};

/// Sentinel ranking value for symbols with an unknown 24h change:
/// strictly below any real percentage, so they sort last but stay in.
const MISSING_CHANGE_SENTINEL: f64 = -100.0;

/// Outcome of one symbol's pass through the pipeline.
#[derive(Debug)]
pub enum SymbolOutcome {
    Signal(Signal),
    NoSignal,
    Skipped(ScanError),
}

#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: SymbolOutcome,
}

/// Rank candidate symbols by descending 24h percentage change and take
/// the top `top_n`.
///
/// Only pairs settling in `quote_asset` are eligible; leveraged
/// UP/DOWN token variants of the same base asset are excluded by name.
/// Pure function, no side effects.
pub fn rank_top_gainers(tickers: &[TickerStats], quote_asset: &str, top_n: usize) -> Vec<String> {
    let mut eligible: Vec<(&str, f64)> = tickers
        .iter()
        .filter(|t| {
            let Some(base) = t.symbol.strip_suffix(quote_asset) else {
                return false;
            };
            !base.is_empty() && !base.ends_with("UP") && !base.ends_with("DOWN")
        })
        .map(|t| {
            (
                t.symbol.as_str(),
                t.price_change_pct.unwrap_or(MISSING_CHANGE_SENTINEL),
            )
        })
        .collect();

    eligible.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    eligible
        .into_iter()
        .take(top_n)
        .map(|(symbol, _)| symbol.to_string())
        .collect()
}

/// One full scan pass: rank candidates, run the signal engine over
/// each sequentially, and dispatch alerts for completed signals.
///
/// Per-symbol failures are recorded and isolated; the remaining
/// candidates are always processed. Only ticker retrieval itself is a
/// scan-level error. Holds no state across invocations.
pub async fn run_scan(
    cfg: &AppCfg,
    market: &dyn MarketData,
    notifier: &dyn Notifier,
) -> Result<Vec<SymbolReport>, ScanError> {
    let tickers = market.fetch_tickers().await?;
    let candidates = rank_top_gainers(&tickers, &cfg.scanner.quote_asset, cfg.scanner.top_n);
    info!(
        "SCANNER: scanning top {} of {} tickers",
        candidates.len(),
        tickers.len()
    );

    let mut reports = Vec::with_capacity(candidates.len());
    for symbol in candidates {
        let outcome = scan_symbol(cfg, market, notifier, &symbol).await;
        if let SymbolOutcome::Skipped(err) = &outcome {
            warn!("SCANNER: skipped {symbol}: {err}");
        }
        reports.push(SymbolReport { symbol, outcome });

        // Sequential on purpose: the exchange rate limit is shared.
        if cfg.scanner.symbol_pause_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(cfg.scanner.symbol_pause_ms))
                .await;
        }
    }

    let signals = reports
        .iter()
        .filter(|r| matches!(r.outcome, SymbolOutcome::Signal(_)))
        .count();
    info!(
        "SCANNER: scan complete, {} signal(s) across {} symbol(s)",
        signals,
        reports.len()
    );
    Ok(reports)
}

async fn scan_symbol(
    cfg: &AppCfg,
    market: &dyn MarketData,
    notifier: &dyn Notifier,
    symbol: &str,
) -> SymbolOutcome {
    let candles = match market
        .fetch_klines(symbol, &cfg.scanner.timeframe, cfg.scanner.candle_limit)
        .await
    {
        Ok(candles) => candles,
        Err(err) => return SymbolOutcome::Skipped(err),
    };

    if candles.len() < cfg.scanner.candle_limit as usize {
        return SymbolOutcome::Skipped(ScanError::InsufficientData {
            got: candles.len(),
            need: cfg.scanner.candle_limit as usize,
        });
    }

    let signal = match strategy::evaluate(symbol, &candles, &cfg.strategy) {
        Ok(Some(signal)) => signal,
        Ok(None) => return SymbolOutcome::NoSignal,
        Err(err) => return SymbolOutcome::Skipped(err),
    };

    info!(
        "SCANNER: {} signal for {} entry={:.4} sl={:.4} tp={:.4}",
        signal.side, signal.symbol, signal.entry_price, signal.stop_loss, signal.take_profit
    );

    let text = format_alert(
        &signal,
        &cfg.scanner.timeframe,
        cfg.strategy.sl_lookback,
        cfg.strategy.risk_reward,
    );
    if let Err(err) = notifier.notify(&text).await {
        // The signal still counts; delivery is best-effort per scan.
        warn!("SCANNER: alert delivery failed for {}: {err}", signal.symbol);
    }

    SymbolOutcome::Signal(signal)
}
