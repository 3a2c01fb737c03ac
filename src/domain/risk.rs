//! Per-bar stop-loss / take-profit levels derived from the Ichimoku spans.
//!
//! Stateless: levels are computed for every bar, but only become binding
//! once the state machine locks them in at entry. During the Ichimoku
//! warm-up the spans are undefined and no level is available.

use crate::domain::params::SimulationParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLevels {
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl RiskLevels {
    pub fn none() -> Self {
        RiskLevels {
            stop_loss: None,
            take_profit: None,
        }
    }
}

/// stop = stop_loss_multiplier × Senkou Span B, target = take_profit_multiplier × Senkou Span A.
pub fn compute_risk_levels(
    senkou_a: Option<f64>,
    senkou_b: Option<f64>,
    params: &SimulationParams,
) -> RiskLevels {
    RiskLevels {
        stop_loss: senkou_b.map(|b| params.stop_loss_multiplier * b),
        take_profit: senkou_a.map(|a| params.take_profit_multiplier * a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_from_spans() {
        let params = SimulationParams::default();
        let levels = compute_risk_levels(Some(100.0), Some(100.0), &params);
        assert_eq!(levels.stop_loss, Some(85.0));
        assert_eq!(levels.take_profit, Some(160.0));
    }

    #[test]
    fn undefined_spans_give_no_levels() {
        let params = SimulationParams::default();
        assert_eq!(
            compute_risk_levels(None, None, &params),
            RiskLevels::none()
        );

        let only_b = compute_risk_levels(None, Some(200.0), &params);
        assert_eq!(only_b.stop_loss, Some(170.0));
        assert_eq!(only_b.take_profit, None);
    }

    #[test]
    fn multipliers_are_configurable() {
        let params = SimulationParams {
            stop_loss_multiplier: 0.9,
            take_profit_multiplier: 1.2,
            ..Default::default()
        };
        let levels = compute_risk_levels(Some(50.0), Some(80.0), &params);
        assert_eq!(levels.stop_loss, Some(72.0));
        assert_eq!(levels.take_profit, Some(60.0));
    }
}
