//! Report output port trait.

use crate::domain::error::KumosimError;
use crate::domain::recorder::ReportRow;
use std::path::Path;

/// Port for persisting the per-bar report series.
pub trait ReportPort {
    fn write(&self, rows: &[ReportRow], output_path: &Path) -> Result<(), KumosimError>;
}
