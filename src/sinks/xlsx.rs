use std::{fs::File, io::BufWriter};

use camino::{Utf8Path, Utf8PathBuf};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::debug;

use crate::{
    error::ConvertError,
    sinks::{SinkResult, TableSink},
    table::Table,
};

pub const SHEET_NAME: &str = "Sheet1";

/// Worksheet grid limits for the XLSX format.
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;

/// Writes a table as a single-worksheet workbook. Every value is stored as a
/// string cell.
///
/// Empty values become blank text-format cells so the sheet's `<dimension>`
/// spans the whole table; empty strings are not stored at all.
pub struct XlsxSink {
    path: Utf8PathBuf,
}

impl XlsxSink {
    pub fn new(path: impl AsRef<Utf8Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    fn build_workbook(&self, table: &Table) -> Result<Workbook, ConvertError> {
        // header occupies one row
        if table.num_rows() + 1 > MAX_ROWS {
            return Err(ConvertError::workbook(format!(
                "table has {} data rows, more than an XLSX worksheet can hold ({})",
                table.num_rows(),
                MAX_ROWS - 1
            )));
        }
        if table.num_columns() > MAX_COLUMNS {
            return Err(ConvertError::workbook(format!(
                "table has {} columns, more than an XLSX worksheet can hold ({MAX_COLUMNS})",
                table.num_columns()
            )));
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME).map_err(workbook_error)?;
        let text = Format::new().set_num_format("@");

        for (row, record) in table.records().enumerate() {
            for (col, value) in record.iter().enumerate() {
                // both indices are bounded by the grid checks above
                let (row, col) = (row as u32, col as u16);
                let written = if value.is_empty() {
                    worksheet.write_blank(row, col, &text)
                } else {
                    worksheet.write_string(row, col, value)
                };
                written.map_err(workbook_error)?;
            }
        }

        Ok(workbook)
    }
}

impl TableSink for XlsxSink {
    fn write_table(&mut self, table: &Table) -> Result<SinkResult, ConvertError> {
        let mut workbook = self.build_workbook(table)?;

        let file = File::create(&self.path).map_err(|e| ConvertError::io(&self.path, e))?;
        workbook
            .save_to_writer(BufWriter::new(file))
            .map_err(workbook_error)?;

        debug!(
            path = %self.path,
            sheet = SHEET_NAME,
            rows = table.num_rows(),
            "wrote xlsx"
        );

        Ok(SinkResult {
            file_written: self.path.clone(),
            rows_written: table.num_rows() as u64,
        })
    }
}

fn workbook_error(err: XlsxError) -> ConvertError {
    ConvertError::workbook(err.to_string())
}
