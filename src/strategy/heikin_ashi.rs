use crate::types::Candle;

/// Heikin-Ashi values aligned index-for-index with the input series.
#[derive(Debug, Clone)]
pub struct HeikinAshi {
    pub ha_open: Vec<f64>,
    pub ha_close: Vec<f64>,
}

/// Convert a raw candle series into Heikin-Ashi open/close values.
///
/// `ha_close` is a pointwise OHLC average. `ha_open` is a running
/// recurrence seeded from the first candle and carried forward in
/// strict index order; it cannot be computed pointwise.
pub fn heikin_ashi(candles: &[Candle]) -> HeikinAshi {
    let mut ha_open = Vec::with_capacity(candles.len());
    let mut ha_close = Vec::with_capacity(candles.len());

    for (i, c) in candles.iter().enumerate() {
        ha_close.push((c.open + c.high + c.low + c.close) / 4.0);
        if i == 0 {
            ha_open.push((c.open + c.close) / 2.0);
        } else {
            ha_open.push((ha_open[i - 1] + ha_close[i - 1]) / 2.0);
        }
    }

    HeikinAshi { ha_open, ha_close }
}
