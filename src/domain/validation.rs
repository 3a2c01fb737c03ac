//! Preflight checks on a bar series before enrichment and simulation.
//!
//! Everything downstream assumes a strictly ascending, gap-tolerant daily
//! series with sane prices. Catching a shuffled or corrupt file here gives
//! the operator one clear error instead of a quietly wrong equity curve.

use crate::domain::error::KumosimError;
use crate::domain::ohlcv::OhlcvBar;

/// Fewer bars than this cannot fill the longest indicator window plus one
/// tradable bar, so the simulation would be a pure warm-up no-op.
pub const MIN_SIMULATION_BARS: usize = 53;

/// Validates a bar series fetched for one symbol.
///
/// Checks, in order: non-empty, minimum length, strictly ascending unique
/// dates, finite non-negative prices with `high >= low` on every bar.
pub fn validate_bars(bars: &[OhlcvBar], code: &str, market: &str) -> Result<(), KumosimError> {
    if bars.is_empty() {
        return Err(KumosimError::NoData {
            code: code.to_string(),
            market: market.to_string(),
        });
    }

    if bars.len() < MIN_SIMULATION_BARS {
        return Err(KumosimError::InsufficientData {
            code: code.to_string(),
            market: market.to_string(),
            bars: bars.len(),
            minimum: MIN_SIMULATION_BARS,
        });
    }

    for window in bars.windows(2) {
        if window[1].date <= window[0].date {
            let reason = if window[1].date == window[0].date {
                format!("duplicate date (previous bar is {})", window[0].date)
            } else {
                format!("date goes backwards (previous bar is {})", window[0].date)
            };
            return Err(KumosimError::Ordering {
                date: window[1].date,
                reason,
            });
        }
    }

    for bar in bars {
        check_prices(bar)?;
    }

    Ok(())
}

fn check_prices(bar: &OhlcvBar) -> Result<(), KumosimError> {
    let fields = [
        ("open", bar.open),
        ("high", bar.high),
        ("low", bar.low),
        ("close", bar.close),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(KumosimError::Data {
                date: bar.date,
                reason: format!("{name} is not finite"),
            });
        }
        if value < 0.0 {
            return Err(KumosimError::Data {
                date: bar.date,
                reason: format!("{name} is negative ({value})"),
            });
        }
    }
    if bar.high < bar.low {
        return Err(KumosimError::Data {
            date: bar.date,
            reason: format!("high {} below low {}", bar.high, bar.low),
        });
    }
    Ok(())
}
