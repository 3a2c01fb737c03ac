//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for kumosim.
#[derive(Debug, thiserror::Error)]
pub enum KumosimError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("input for {source_name} is missing required columns: {}", missing.join(", "))]
    Schema {
        source_name: String,
        missing: Vec<String>,
    },

    #[error("bars out of order at {date}: {reason}")]
    Ordering { date: NaiveDate, reason: String },

    #[error("bad data at {date}: {reason}")]
    Data { date: NaiveDate, reason: String },

    #[error("no data for {code} on {market}")]
    NoData { code: String, market: String },

    #[error("insufficient data for {code} on {market}: have {bars} bars, need {minimum}")]
    InsufficientData {
        code: String,
        market: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&KumosimError> for std::process::ExitCode {
    fn from(err: &KumosimError) -> Self {
        let code: u8 = match err {
            KumosimError::Io(_) => 1,
            KumosimError::ConfigParse { .. }
            | KumosimError::ConfigMissing { .. }
            | KumosimError::ConfigInvalid { .. } => 2,
            KumosimError::DataSource { .. } | KumosimError::Schema { .. } => 3,
            KumosimError::Ordering { .. } | KumosimError::Data { .. } => 4,
            KumosimError::NoData { .. } | KumosimError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
