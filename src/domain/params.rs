//! Simulation parameters.

/// Tunable parameters of the simulation. Defaults reproduce the reference
/// policy: all-in entries of a 100-unit account, half-position take-profit
/// sales, Ichimoku-anchored risk levels with 0.85/1.6 multipliers.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub initial_cash: f64,
    pub partial_exit_fraction: f64,
    pub stop_loss_multiplier: f64,
    pub take_profit_multiplier: f64,
    pub temu_period: usize,
    pub stoch_period: usize,
    pub stoch_smoothing: usize,
    pub tenkan_period: usize,
    pub kijun_period: usize,
    pub senkou_b_period: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            initial_cash: 100.0,
            partial_exit_fraction: 0.5,
            stop_loss_multiplier: 0.85,
            take_profit_multiplier: 1.6,
            temu_period: 20,
            stoch_period: 14,
            stoch_smoothing: 3,
            tenkan_period: 9,
            kijun_period: 26,
            senkou_b_period: 52,
        }
    }
}

impl SimulationParams {
    /// Longest rolling window any derived indicator needs; bars beyond
    /// this index always carry fully defined risk levels.
    pub fn warmup_bars(&self) -> usize {
        self.senkou_b_period
            .max(self.kijun_period)
            .max(self.temu_period)
            .max(self.stoch_period + self.stoch_smoothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_policy() {
        let p = SimulationParams::default();
        assert!((p.initial_cash - 100.0).abs() < f64::EPSILON);
        assert!((p.partial_exit_fraction - 0.5).abs() < f64::EPSILON);
        assert!((p.stop_loss_multiplier - 0.85).abs() < f64::EPSILON);
        assert!((p.take_profit_multiplier - 1.6).abs() < f64::EPSILON);
        assert_eq!(p.temu_period, 20);
        assert_eq!(p.stoch_period, 14);
        assert_eq!(p.stoch_smoothing, 3);
        assert_eq!(p.tenkan_period, 9);
        assert_eq!(p.kijun_period, 26);
        assert_eq!(p.senkou_b_period, 52);
    }

    #[test]
    fn warmup_is_longest_window() {
        assert_eq!(SimulationParams::default().warmup_bars(), 52);

        let short = SimulationParams {
            senkou_b_period: 5,
            kijun_period: 4,
            temu_period: 30,
            stoch_period: 3,
            stoch_smoothing: 2,
            ..Default::default()
        };
        assert_eq!(short.warmup_bars(), 30);
    }
}
