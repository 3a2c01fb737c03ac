//! CSV report writer adapter.

use crate::domain::error::KumosimError;
use crate::domain::recorder::ReportRow;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

const HEADER: [&str; 12] = [
    "Date",
    "Close",
    "Cash",
    "Position_Value",
    "Total_Value",
    "Unrealized_Return_Pct",
    "Entry_Price",
    "Active_Stop_Loss",
    "Active_Take_Profit",
    "Entered",
    "Partial_Exit",
    "Fully_Closed",
];

fn optional(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, rows: &[ReportRow], output_path: &Path) -> Result<(), KumosimError> {
        let mut wtr =
            csv::Writer::from_path(output_path).map_err(|e| KumosimError::DataSource {
                reason: format!("failed to open {}: {}", output_path.display(), e),
            })?;

        wtr.write_record(HEADER)
            .map_err(|e| KumosimError::DataSource {
                reason: format!("failed to write report header: {}", e),
            })?;

        for row in rows {
            wtr.write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.close.to_string(),
                row.cash.to_string(),
                row.position_value.to_string(),
                row.total_value.to_string(),
                row.unrealized_return_pct.to_string(),
                optional(row.entry_price),
                optional(row.active_stop_loss),
                optional(row.active_take_profit),
                row.entered.to_string(),
                row.partial_exit.to_string(),
                row.fully_closed.to_string(),
            ])
            .map_err(|e| KumosimError::DataSource {
                reason: format!("failed to write report row for {}: {}", row.date, e),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }
}
