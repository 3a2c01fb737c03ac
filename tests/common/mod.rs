#![allow(dead_code)]

use chrono::NaiveDate;
use kumosim::domain::enrich::EnrichedBar;
use kumosim::domain::error::KumosimError;
pub use kumosim::domain::ohlcv::OhlcvBar;
use kumosim::domain::risk::RiskLevels;
use kumosim::domain::signal::SignalFlags;
use kumosim::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        code: &str,
        _market: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, KumosimError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(KumosimError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_symbols(&self, _market: &str) -> Result<Vec<String>, KumosimError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
        _market: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, KumosimError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(KumosimError::DataSource {
                reason: reason.clone(),
            });
        }
        match self.data.get(code) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(i: usize) -> NaiveDate {
    date(2023, 1, 2) + chrono::Duration::days(i as i64)
}

pub fn make_bar(code: &str, date_str: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        code: code.to_string(),
        market: "BME".to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
        stoch_k: 50.0,
        stoch_d: 50.0,
        adx: 20.0,
        sma: close,
        atr: 1.0,
    }
}

pub fn bar_at(code: &str, i: usize, close: f64) -> OhlcvBar {
    OhlcvBar {
        code: code.to_string(),
        market: "BME".to_string(),
        date: day(i),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
        stoch_k: 50.0,
        stoch_d: 50.0,
        adx: 20.0,
        sma: close,
        atr: 1.0,
    }
}

/// Sequential daily bars whose close follows the given path.
pub fn bars_from_closes(code: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| bar_at(code, i, c))
        .collect()
}

/// `count` bars with a gentle deterministic oscillation around `base`.
pub fn generate_bars(code: &str, count: usize, base: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let close = base + ((i % 7) as f64) - 3.0;
            bar_at(code, i, close)
        })
        .collect()
}

/// A handcrafted enriched bar: no signals, levels anchored at the close,
/// high/low pinned to the close so nothing triggers unless a test says so.
pub fn quiet_enriched(i: usize, close: f64) -> EnrichedBar {
    let mut bar = bar_at("SAN", i, close);
    bar.high = close;
    bar.low = close;
    EnrichedBar {
        bar,
        temu: Some(close),
        stoch_k: Some(50.0),
        stoch_d: Some(50.0),
        tenkan: Some(close),
        kijun: Some(close),
        senkou_a: Some(close),
        senkou_b: Some(close),
        signals: SignalFlags {
            buy: false,
            sell: false,
        },
        risk: RiskLevels {
            stop_loss: Some(close * 0.85),
            take_profit: Some(close * 1.6),
        },
    }
}

/// An enriched warm-up bar: all derived fields undefined, no risk levels.
pub fn warmup_enriched(i: usize, close: f64) -> EnrichedBar {
    EnrichedBar {
        temu: None,
        stoch_k: None,
        stoch_d: None,
        tenkan: None,
        kijun: None,
        senkou_a: None,
        senkou_b: None,
        risk: RiskLevels::none(),
        ..quiet_enriched(i, close)
    }
}

/// A constant-price enriched series with the given signal/trigger edits
/// applied afterwards by the test.
pub fn quiet_series(closes: &[f64]) -> Vec<EnrichedBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| quiet_enriched(i, c))
        .collect()
}
