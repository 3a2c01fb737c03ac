//! kumosim: Ichimoku-anchored single-asset trading simulator.
//!
//! Replays a daily OHLCV series (pre-enriched with technical indicator
//! columns) through a fixed long-only entry/exit policy with partial
//! take-profit and a ratcheting stop-loss, producing a per-bar account
//! time series for external reporting.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
