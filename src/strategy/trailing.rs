use crate::types::Side;

/// UT Bot trailing stop: one value per candle, folded in strict index
/// order over the smoothed closes and the per-index loss threshold.
///
/// Index 0 is seeded to 0.0 regardless of price. While the loss
/// threshold is NaN (ATR warm-up) the branch comparisons fall through
/// exactly as in IEEE arithmetic; the stop settles once the threshold
/// is defined, and the detector refuses to act on non-finite values.
pub fn trailing_stop(prices: &[f64], loss: &[f64]) -> Vec<f64> {
    debug_assert_eq!(prices.len(), loss.len());
    let mut stops = vec![0.0; prices.len()];

    for i in 1..prices.len() {
        let prev_stop = stops[i - 1];
        let price = prices[i];
        let prev_price = prices[i - 1];
        let n_loss = loss[i];

        // Four branches, tested in this exact priority order.
        stops[i] = if price > prev_stop && prev_price > prev_stop {
            prev_stop.max(price - n_loss)
        } else if price < prev_stop && prev_price < prev_stop {
            prev_stop.min(price + n_loss)
        } else if price > prev_stop {
            price - n_loss
        } else {
            price + n_loss
        };
    }

    stops
}

/// Inspect the two most recent price/stop pairs for a crossover.
///
/// Both pairs must be finite; a series still inside the ATR warm-up
/// window produces no signal rather than a NaN comparison.
pub fn detect_cross(prices: &[f64], stops: &[f64]) -> Option<Side> {
    let n = prices.len();
    if n < 2 || stops.len() != n {
        return None;
    }

    let (price, prev_price) = (prices[n - 1], prices[n - 2]);
    let (stop, prev_stop) = (stops[n - 1], stops[n - 2]);
    if !price.is_finite() || !prev_price.is_finite() || !stop.is_finite() || !prev_stop.is_finite()
    {
        return None;
    }

    if price > stop && prev_price <= prev_stop {
        Some(Side::Long)
    } else if price < stop && prev_price >= prev_stop {
        Some(Side::Short)
    } else {
        None
    }
}
