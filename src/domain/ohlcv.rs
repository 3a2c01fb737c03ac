//! Input bar representation: OHLCV plus the pre-enriched indicator columns.

use chrono::NaiveDate;

/// One daily bar as supplied by the data source.
///
/// The enrichment pipeline that produced the input has already attached
/// `Stochastic_K`, `Stochastic_D`, `ADX`, `SMA` and `Average_True_Range`
/// columns; they ride along untouched except for warm-up normalization
/// (non-finite leading values are zeroed before simulation, see
/// [`crate::domain::enrich`]).
#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub code: String,
    pub market: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub adx: f64,
    pub sma: f64,
    pub atr: f64,
}

impl OhlcvBar {
    /// Midpoint of the bar's range, the building block of every Ichimoku line.
    pub fn hl_midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> OhlcvBar {
        OhlcvBar {
            code: "SAN".into(),
            market: "BME".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
            stoch_k: 55.0,
            stoch_d: 50.0,
            adx: 20.0,
            sma: 101.0,
            atr: 2.5,
        }
    }

    #[test]
    fn hl_midpoint() {
        let bar = sample_bar();
        assert!((bar.hl_midpoint() - 100.0).abs() < f64::EPSILON);
    }
}
