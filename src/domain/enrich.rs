//! Bar enrichment: derived indicators, signal flags and risk levels.
//!
//! This is the vectorizable front half of the pipeline: one pass over
//! the whole series, no simulation state. The first step normalizes any
//! non-finite carried indicator column to zero, which is the documented
//! warm-up policy for caller-supplied enrichment columns; the derived
//! series below keep their own warm-up as `None` instead, so an
//! undefined Ichimoku span can never masquerade as a zero-price stop.

use crate::domain::indicator::ichimoku::calculate_ichimoku;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stochastic::calculate_stochastic;
use crate::domain::indicator::IndicatorValue;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::params::SimulationParams;
use crate::domain::risk::{compute_risk_levels, RiskLevels};
use crate::domain::signal::{generate_signals, SignalFlags, SignalInputs};

/// One bar with everything the state machine needs attached.
#[derive(Debug, Clone)]
pub struct EnrichedBar {
    pub bar: OhlcvBar,
    pub temu: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub senkou_a: Option<f64>,
    pub senkou_b: Option<f64>,
    pub signals: SignalFlags,
    pub risk: RiskLevels,
}

impl EnrichedBar {
    pub fn date(&self) -> chrono::NaiveDate {
        self.bar.date
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn normalize(bar: &OhlcvBar) -> OhlcvBar {
    let zero_if_bad = |v: f64| if v.is_finite() { v } else { 0.0 };
    OhlcvBar {
        stoch_k: zero_if_bad(bar.stoch_k),
        stoch_d: zero_if_bad(bar.stoch_d),
        adx: zero_if_bad(bar.adx),
        sma: zero_if_bad(bar.sma),
        atr: zero_if_bad(bar.atr),
        ..bar.clone()
    }
}

/// Runs the whole derivation pass over an ordered bar sequence.
pub fn enrich(bars: &[OhlcvBar], params: &SimulationParams) -> Vec<EnrichedBar> {
    let normalized: Vec<OhlcvBar> = bars.iter().map(normalize).collect();

    let temu = calculate_sma(&normalized, params.temu_period);
    let stochastic =
        calculate_stochastic(&normalized, params.stoch_period, params.stoch_smoothing);
    let ichimoku = calculate_ichimoku(
        &normalized,
        params.tenkan_period,
        params.kijun_period,
        params.senkou_b_period,
    );

    normalized
        .into_iter()
        .enumerate()
        .map(|(i, bar)| {
            let temu_val = temu
                .values
                .get(i)
                .filter(|p| p.valid)
                .and_then(|p| p.value.simple());

            let (stoch_k, stoch_d) = match stochastic.values.get(i).map(|p| &p.value) {
                Some(IndicatorValue::Stochastic { k, d }) => (finite(*k), finite(*d)),
                _ => (None, None),
            };

            let (tenkan, kijun, senkou_a, senkou_b) =
                match ichimoku.values.get(i).map(|p| &p.value) {
                    Some(IndicatorValue::Ichimoku {
                        tenkan,
                        kijun,
                        senkou_a,
                        senkou_b,
                    }) => (
                        finite(*tenkan),
                        finite(*kijun),
                        finite(*senkou_a),
                        finite(*senkou_b),
                    ),
                    _ => (None, None, None, None),
                };

            let signals = generate_signals(&SignalInputs {
                close: bar.close,
                temu: temu_val,
                stoch_k,
                stoch_d,
                tenkan,
                kijun,
            });
            let risk = compute_risk_levels(senkou_a, senkou_b, params);

            EnrichedBar {
                bar,
                temu: temu_val,
                stoch_k,
                stoch_d,
                tenkan,
                kijun,
                senkou_a,
                senkou_b,
                signals,
                risk,
            }
        })
        .collect()
}
