//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod risk;
pub mod enrich;
pub mod validation;
pub mod simulation;
pub mod recorder;
pub mod params;
pub mod config_validation;
pub mod error;
