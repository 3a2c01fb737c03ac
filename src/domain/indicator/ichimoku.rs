//! Ichimoku Kinko Hyo lines.
//!
//! Each line is a rolling high/low midpoint: tenkan over 9 bars, kijun
//! over 26, Senkou Span B over 52; Senkou Span A is the tenkan/kijun
//! midpoint. No forward displacement is applied; the spans are used as
//! same-bar stop/target anchors, not plotted as a cloud. A component is
//! NaN until its own window is full; the point's `valid` flag tracks the
//! shortest (tenkan) window.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

fn rolling_midpoint(bars: &[OhlcvBar], i: usize, period: usize) -> f64 {
    if i + 1 < period {
        return f64::NAN;
    }
    let window = &bars[i + 1 - period..=i];
    let high_max = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let low_min = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    (high_max + low_min) / 2.0
}

pub fn calculate_ichimoku(
    bars: &[OhlcvBar],
    tenkan_period: usize,
    kijun_period: usize,
    senkou_b_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ichimoku {
        tenkan: tenkan_period,
        kijun: kijun_period,
        senkou_b: senkou_b_period,
    };
    if tenkan_period == 0 || kijun_period == 0 || senkou_b_period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tenkan = rolling_midpoint(bars, i, tenkan_period);
        let kijun = rolling_midpoint(bars, i, kijun_period);
        let senkou_a = (tenkan + kijun) / 2.0;
        let senkou_b = rolling_midpoint(bars, i, senkou_b_period);

        values.push(IndicatorPoint {
            date: bar.date,
            valid: tenkan.is_finite(),
            value: IndicatorValue::Ichimoku {
                tenkan,
                kijun,
                senkou_a,
                senkou_b,
            },
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(i: usize, high: f64, low: f64) -> OhlcvBar {
        OhlcvBar {
            code: "TEST".into(),
            market: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(i as i64),
            open: (high + low) / 2.0,
            high,
            low,
            close: (high + low) / 2.0,
            volume: 1000.0,
            stoch_k: 0.0,
            stoch_d: 0.0,
            adx: 0.0,
            sma: 0.0,
            atr: 0.0,
        }
    }

    fn components(point: &IndicatorPoint) -> (f64, f64, f64, f64) {
        match point.value {
            IndicatorValue::Ichimoku {
                tenkan,
                kijun,
                senkou_a,
                senkou_b,
            } => (tenkan, kijun, senkou_a, senkou_b),
            _ => panic!("expected ichimoku value"),
        }
    }

    #[test]
    fn warmup_per_component() {
        let bars: Vec<OhlcvBar> = (0..10)
            .map(|i| make_bar(i, 110.0 + i as f64, 90.0 + i as f64))
            .collect();
        let series = calculate_ichimoku(&bars, 3, 5, 8);

        let (t1, k1, a1, b1) = components(&series.values[1]);
        assert!(!t1.is_finite() && !k1.is_finite() && !a1.is_finite() && !b1.is_finite());

        let (t2, k2, a2, _) = components(&series.values[2]);
        assert!(t2.is_finite());
        assert!(!k2.is_finite());
        assert!(!a2.is_finite()); // senkou A needs kijun

        let (_, k4, a4, b4) = components(&series.values[4]);
        assert!(k4.is_finite() && a4.is_finite());
        assert!(!b4.is_finite());

        let (_, _, _, b7) = components(&series.values[7]);
        assert!(b7.is_finite());
    }

    #[test]
    fn midpoint_values() {
        // Flat range: every midpoint is (110 + 90) / 2 = 100.
        let bars: Vec<OhlcvBar> = (0..8).map(|i| make_bar(i, 110.0, 90.0)).collect();
        let series = calculate_ichimoku(&bars, 3, 5, 8);

        let (t, k, a, b) = components(&series.values[7]);
        assert!((t - 100.0).abs() < 1e-12);
        assert!((k - 100.0).abs() < 1e-12);
        assert!((a - 100.0).abs() < 1e-12);
        assert!((b - 100.0).abs() < 1e-12);
    }

    #[test]
    fn tenkan_tracks_recent_window() {
        let mut bars: Vec<OhlcvBar> = (0..6).map(|i| make_bar(i, 110.0, 90.0)).collect();
        bars.push(make_bar(6, 130.0, 120.0));
        let series = calculate_ichimoku(&bars, 3, 5, 8);

        // Tenkan window is bars 4..=6: high 130, low 90 → 110.
        let (t, _, _, _) = components(&series.values[6]);
        assert!((t - 110.0).abs() < 1e-12);
    }

    #[test]
    fn validity_follows_tenkan() {
        let bars: Vec<OhlcvBar> = (0..5).map(|i| make_bar(i, 110.0, 90.0)).collect();
        let series = calculate_ichimoku(&bars, 3, 5, 8);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
    }

    #[test]
    fn empty_and_zero_period() {
        assert!(calculate_ichimoku(&[], 9, 26, 52).values.is_empty());
        let bars = vec![make_bar(0, 110.0, 90.0)];
        assert!(calculate_ichimoku(&bars, 0, 26, 52).values.is_empty());
        assert!(calculate_ichimoku(&bars, 9, 0, 52).values.is_empty());
        assert!(calculate_ichimoku(&bars, 9, 26, 0).values.is_empty());
    }
}
