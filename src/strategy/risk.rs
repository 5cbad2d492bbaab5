use crate::error::ScanError;
use crate::types::{Candle, Side};

#[derive(Debug, Clone, Copy)]
pub struct RiskTargets {
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Place the stop at the swing extreme of the last `lookback` candles
/// (inclusive of the signal candle) and the target at `risk_reward`
/// times the risked distance.
///
/// A stop on the wrong side of the entry means non-positive risk; the
/// signal is degenerate and must be suppressed.
pub fn risk_targets(
    side: Side,
    entry_price: f64,
    candles: &[Candle],
    lookback: usize,
    risk_reward: f64,
) -> Result<RiskTargets, ScanError> {
    let window_start = candles.len().saturating_sub(lookback);
    let window = &candles[window_start..];

    let (stop_loss, risk) = match side {
        Side::Long => {
            let swing_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
            (swing_low, entry_price - swing_low)
        }
        Side::Short => {
            let swing_high = window
                .iter()
                .map(|c| c.high)
                .fold(f64::NEG_INFINITY, f64::max);
            (swing_high, swing_high - entry_price)
        }
    };

    if !(risk > 0.0) {
        return Err(ScanError::DegenerateRisk {
            side,
            entry: entry_price,
            stop_loss,
        });
    }

    let take_profit = match side {
        Side::Long => entry_price + risk * risk_reward,
        Side::Short => entry_price - risk * risk_reward,
    };

    Ok(RiskTargets {
        stop_loss,
        take_profit,
    })
}
