//! Rolling-window indicator calculations the simulator derives itself.
//!
//! The enriched input already carries oscillator columns from the external
//! pipeline, but the trading policy is defined over freshly computed
//! series: a 20-bar close average ("Temu"), a 14/3 stochastic pair and the
//! Ichimoku lines. Types:
//! - `IndicatorPoint`: a single dated point with a warm-up validity flag
//! - `IndicatorValue`: enum for the different output shapes
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a full time series of points

pub mod sma;
pub mod stochastic;
pub mod ichimoku;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Stochastic {
        k: f64,
        d: f64,
    },
    Ichimoku {
        tenkan: f64,
        kijun: f64,
        senkou_a: f64,
        senkou_b: f64,
    },
}

impl IndicatorValue {
    /// The scalar payload, or `None` for multi-component values.
    pub fn simple(&self) -> Option<f64> {
        match self {
            IndicatorValue::Simple(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Stochastic { k_period: usize, d_period: usize },
    Ichimoku { tenkan: usize, kijun: usize, senkou_b: usize },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
            IndicatorType::Ichimoku {
                tenkan,
                kijun,
                senkou_b,
            } => write!(f, "ICHIMOKU({},{},{})", tenkan, kijun, senkou_b),
        }
    }
}
