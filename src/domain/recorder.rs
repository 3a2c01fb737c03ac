//! Projects simulation states into report rows.
//!
//! Pure projection, no business logic. Rounding to one decimal happens
//! here and only here, so the simulation itself never compounds
//! rounding error across long series.

use chrono::NaiveDate;

use crate::domain::simulation::AccountState;

/// One line of the output report, already rounded for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub close: f64,
    pub cash: f64,
    pub position_value: f64,
    pub total_value: f64,
    pub unrealized_return_pct: f64,
    pub entry_price: Option<f64>,
    pub active_stop_loss: Option<f64>,
    pub active_take_profit: Option<f64>,
    pub entered: bool,
    pub partial_exit: f64,
    pub fully_closed: bool,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl ReportRow {
    pub fn from_state(state: &AccountState) -> Self {
        ReportRow {
            date: state.date,
            close: state.close,
            cash: round1(state.cash),
            position_value: round1(state.position_value),
            total_value: round1(state.total_value()),
            unrealized_return_pct: round1(state.unrealized_return_pct()),
            entry_price: state.entry_price(),
            active_stop_loss: state.active_stop_loss().map(round1),
            active_take_profit: state.active_take_profit().map(round1),
            entered: state.entered,
            partial_exit: state.partial_exit,
            fully_closed: state.fully_closed,
        }
    }
}

/// Turns the ordered state sequence into the report series.
pub fn record(states: &[AccountState]) -> Vec<ReportRow> {
    states.iter().map(ReportRow::from_state).collect()
}
