//! Stochastic oscillator %K / %D.
//!
//! %K = (close − min(low, n)) / (max(high, n) − min(low, n)) × 100,
//! %D = m-bar simple average of %K. A zero high-low range leaves %K
//! undefined for that bar (NaN, flagged invalid), mirroring the behavior
//! of the producing pipeline; downstream signal comparisons treat an
//! undefined operand as false.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stochastic(
    bars: &[OhlcvBar],
    k_period: usize,
    d_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Stochastic { k_period, d_period };
    if k_period == 0 || d_period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let mut k_vals: Vec<f64> = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < k_period {
            k_vals.push(f64::NAN);
            continue;
        }
        let window = &bars[i + 1 - k_period..=i];
        let low_min = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let high_max = window
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = high_max - low_min;
        if range > 0.0 {
            k_vals.push((bar.close - low_min) / range * 100.0);
        } else {
            k_vals.push(f64::NAN);
        }
    }

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let d = if i + 1 < d_period {
            f64::NAN
        } else {
            // NaN in the smoothing window propagates, as a rolling mean would.
            let window = &k_vals[i + 1 - d_period..=i];
            window.iter().sum::<f64>() / d_period as f64
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid: k_vals[i].is_finite(),
            value: IndicatorValue::Stochastic { k: k_vals[i], d },
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
