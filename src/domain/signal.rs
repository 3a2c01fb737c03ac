//! Buy/sell signal generation.
//!
//! Pure per-bar functions over the derived indicator fields. A comparison
//! with an undefined operand is false, so no signal can fire inside an
//! indicator warm-up window.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalFlags {
    pub buy: bool,
    pub sell: bool,
}

/// Inputs the signal rules read, all `None` while their window warms up.
#[derive(Debug, Clone, Copy)]
pub struct SignalInputs {
    pub close: f64,
    pub temu: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
}

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// Buy: %K above %D while the 20-bar average sits above the close
/// (oscillator turning up under the mean, a pullback entry).
pub fn buy_signal(inputs: &SignalInputs) -> bool {
    gt(inputs.stoch_k, inputs.stoch_d) && gt(inputs.temu, Some(inputs.close))
}

/// Sell: %K below %D with tenkan above kijun and the close above the
/// 20-bar average (momentum fading into an extended move).
pub fn sell_signal(inputs: &SignalInputs) -> bool {
    gt(inputs.stoch_d, inputs.stoch_k)
        && gt(inputs.tenkan, inputs.kijun)
        && gt(Some(inputs.close), inputs.temu)
}

pub fn generate_signals(inputs: &SignalInputs) -> SignalFlags {
    SignalFlags {
        buy: buy_signal(inputs),
        sell: sell_signal(inputs),
    }
}
