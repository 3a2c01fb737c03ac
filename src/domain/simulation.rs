//! The position state machine.
//!
//! Unlike the indicator pass, this is genuinely sequential: bar `i`'s
//! account state is derived from bar `i-1`'s, so bars must be processed
//! strictly in date order. Each bar applies exactly one transition,
//! chosen by a fixed priority: entry/add, then partial take-profit,
//! then full exit, then hold.

use chrono::NaiveDate;

use crate::domain::enrich::EnrichedBar;
use crate::domain::error::KumosimError;
use crate::domain::params::SimulationParams;

/// What the account currently holds. `Flat` carries no levels at all,
/// so a stale stop from a closed position cannot leak into the next one.
#[derive(Debug, Clone, PartialEq)]
pub enum Holding {
    Flat,
    Long {
        entry_price: f64,
        /// Locked at entry, afterwards only ever widened (max-ratcheted).
        stop_loss: Option<f64>,
        take_profit: Option<f64>,
    },
}

/// Account snapshot after one bar's transition has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    pub date: NaiveDate,
    pub close: f64,
    pub cash: f64,
    pub position_value: f64,
    pub position: Holding,
    pub entered: bool,
    /// Fraction of the position sold this bar, 0.0 when none.
    pub partial_exit: f64,
    pub fully_closed: bool,
}

impl AccountState {
    fn seed(bar: &EnrichedBar, initial_cash: f64) -> Self {
        AccountState {
            date: bar.date(),
            close: bar.close(),
            cash: initial_cash,
            position_value: 0.0,
            position: Holding::Flat,
            entered: false,
            partial_exit: 0.0,
            fully_closed: false,
        }
    }

    pub fn total_value(&self) -> f64 {
        self.cash + self.position_value
    }

    pub fn in_position(&self) -> bool {
        matches!(self.position, Holding::Long { .. })
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self.position {
            Holding::Long { entry_price, .. } => Some(entry_price),
            Holding::Flat => None,
        }
    }

    pub fn active_stop_loss(&self) -> Option<f64> {
        match self.position {
            Holding::Long { stop_loss, .. } => stop_loss,
            Holding::Flat => None,
        }
    }

    pub fn active_take_profit(&self) -> Option<f64> {
        match self.position {
            Holding::Long { take_profit, .. } => take_profit,
            Holding::Flat => None,
        }
    }

    pub fn unrealized_return_pct(&self) -> f64 {
        match self.position {
            Holding::Long { entry_price, .. } => (self.close / entry_price - 1.0) * 100.0,
            Holding::Flat => 0.0,
        }
    }
}

/// Widens a stop level, never tightens it. A missing candidate keeps the
/// current level; a missing current level adopts the candidate.
fn ratchet(current: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

/// Marks the prior position value to the current close. Fails rather
/// than letting an undefined ratio poison every later bar.
fn mark_to_market(prev: &AccountState, bar: &EnrichedBar) -> Result<f64, KumosimError> {
    if !(prev.close > 0.0) || !prev.close.is_finite() {
        return Err(KumosimError::Data {
            date: bar.date(),
            reason: format!("prior close {} cannot price a held position", prev.close),
        });
    }
    let marked = prev.position_value * (bar.close() / prev.close);
    if !marked.is_finite() {
        return Err(KumosimError::Data {
            date: bar.date(),
            reason: format!("mark-to-market produced non-finite value {marked}"),
        });
    }
    Ok(marked)
}

/// Applies one bar's transition to the prior account state.
pub fn step(
    prev: &AccountState,
    bar: &EnrichedBar,
    params: &SimulationParams,
) -> Result<AccountState, KumosimError> {
    let mut next = AccountState {
        date: bar.date(),
        close: bar.close(),
        cash: prev.cash,
        position_value: prev.position_value,
        position: prev.position.clone(),
        entered: false,
        partial_exit: 0.0,
        fully_closed: false,
    };

    // A held position is always repriced before any transition logic.
    let marked = if prev.in_position() {
        mark_to_market(prev, bar)?
    } else {
        0.0
    };

    if bar.signals.buy {
        match prev.position {
            Holding::Flat if prev.cash > 0.0 => {
                next.position_value = prev.cash;
                next.cash = 0.0;
                next.position = Holding::Long {
                    entry_price: bar.close(),
                    stop_loss: bar.risk.stop_loss,
                    take_profit: bar.risk.take_profit,
                };
                next.entered = true;
            }
            Holding::Long {
                entry_price,
                stop_loss,
                take_profit,
            } => {
                // Re-invest residual cash (if any) at the current mark and
                // widen the stop. Take-profit is deliberately untouched here.
                next.position_value = marked + prev.cash;
                next.cash = 0.0;
                next.position = Holding::Long {
                    entry_price,
                    stop_loss: ratchet(stop_loss, bar.risk.stop_loss),
                    take_profit,
                };
            }
            Holding::Flat => {
                // Buy with no cash: nothing to do.
            }
        }
        return Ok(next);
    }

    if let Holding::Long {
        entry_price,
        stop_loss,
        take_profit,
    } = prev.position
    {
        if take_profit.is_some_and(|tp| bar.bar.high >= tp) {
            let sold = marked * params.partial_exit_fraction;
            next.cash = prev.cash + sold;
            next.position_value = marked - sold;
            next.position = Holding::Long {
                entry_price,
                stop_loss: ratchet(stop_loss, bar.risk.stop_loss),
                take_profit: bar.risk.take_profit,
            };
            next.partial_exit = params.partial_exit_fraction;
            return Ok(next);
        }

        let stopped = stop_loss.is_some_and(|sl| bar.bar.low <= sl);
        if bar.signals.sell || stopped {
            next.cash = prev.cash + marked;
            next.position_value = 0.0;
            next.position = Holding::Flat;
            next.fully_closed = true;
            return Ok(next);
        }

        // Hold: carry levels, reprice the position.
        next.position_value = marked;
        return Ok(next);
    }

    // Flat hold: cash carries forward untouched.
    Ok(next)
}

/// Runs the state machine over a full enriched series.
///
/// The first bar seeds the account (all cash, no position) without
/// evaluating any transition; transitions run from the second bar on.
pub fn run_simulation(
    bars: &[EnrichedBar],
    params: &SimulationParams,
) -> Result<Vec<AccountState>, KumosimError> {
    let Some(first) = bars.first() else {
        return Ok(Vec::new());
    };

    let mut states = Vec::with_capacity(bars.len());
    states.push(AccountState::seed(first, params.initial_cash));

    for bar in &bars[1..] {
        let prev = states
            .last()
            .ok_or_else(|| KumosimError::Data {
                date: bar.date(),
                reason: "simulation state vanished".to_string(),
            })?;
        let next = step(prev, bar, params)?;
        states.push(next);
    }

    Ok(states)
}
