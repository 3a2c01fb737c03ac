//! Data access port trait.

use crate::domain::error::KumosimError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_bars(
        &self,
        code: &str,
        market: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, KumosimError>;

    fn list_symbols(&self, market: &str) -> Result<Vec<String>, KumosimError>;

    fn get_data_range(
        &self,
        code: &str,
        market: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, KumosimError>;
}
