use crate::types::Candle;

/// Wilder-smoothed Average True Range over `period` candles.
///
/// `TR = max(H-L, |H-prevC|, |L-prevC|)`; the first candle has no
/// previous close so its TR is the plain high-low range. The first
/// defined ATR sits at index `period - 1` (simple mean of the first
/// `period` true ranges); earlier indices are NaN and must be treated
/// as not-ready by callers.
pub fn atr(candles: &[Candle], period: usize) -> Vec<f64> {
    let n = candles.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period {
        return out;
    }

    let mut tr = Vec::with_capacity(n);
    for (i, c) in candles.iter().enumerate() {
        let range = c.high - c.low;
        if i == 0 {
            tr.push(range);
        } else {
            let prev_close = candles[i - 1].close;
            tr.push(range
                .max((c.high - prev_close).abs())
                .max((c.low - prev_close).abs()));
        }
    }

    let mut atr_val = tr[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = atr_val;
    for i in period..n {
        atr_val = (atr_val * (period - 1) as f64 + tr[i]) / period as f64;
        out[i] = atr_val;
    }
    out
}

/// Per-index trailing-stop distance: `key_value * ATR`.
/// NaN wherever the ATR is still warming up.
pub fn loss_threshold(candles: &[Candle], period: usize, key_value: f64) -> Vec<f64> {
    atr(candles, period)
        .into_iter()
        .map(|v| key_value * v)
        .collect()
}
