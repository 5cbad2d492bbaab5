// UT Bot + Heikin Ashi signal engine.
// Pure per-symbol computation; no shared state across symbols.

pub mod heikin_ashi;
pub mod risk;
pub mod trailing;
pub mod volatility;

pub use heikin_ashi::{heikin_ashi, HeikinAshi};
pub use risk::{risk_targets, RiskTargets};
pub use trailing::{detect_cross, trailing_stop};
pub use volatility::{atr, loss_threshold};

use crate::config::StrategyCfg;
use crate::error::ScanError;
use crate::types::{Candle, Signal};
use chrono::Utc;

/// Run the full pipeline over one closed-candle series and report the
/// crossover signal on the most recent candle, if any.
///
/// Candles must be chronological, oldest first, and all closed; the
/// caller is responsible for never passing a still-forming bar.
pub fn evaluate(
    symbol: &str,
    candles: &[Candle],
    cfg: &StrategyCfg,
) -> Result<Option<Signal>, ScanError> {
    if candles.len() < 2 {
        return Ok(None);
    }

    let ha = heikin_ashi(candles);
    let loss = loss_threshold(candles, cfg.atr_period, cfg.key_value);
    let stops = trailing_stop(&ha.ha_close, &loss);

    let Some(side) = detect_cross(&ha.ha_close, &stops) else {
        return Ok(None);
    };

    // Entry is the raw close of the signal candle, not the smoothed
    // Heikin-Ashi close: orders fill at real market prices.
    let entry_price = candles[candles.len() - 1].close;
    let targets = risk_targets(side, entry_price, candles, cfg.sl_lookback, cfg.risk_reward)?;

    Ok(Some(Signal {
        symbol: symbol.to_string(),
        side,
        entry_price,
        stop_loss: targets.stop_loss,
        take_profit: targets.take_profit,
        generated_at: Utc::now(),
    }))
}
