pub mod csv;
pub mod xlsx;

use camino::Utf8PathBuf;

use crate::{error::ConvertError, table::Table};

pub trait TableSink {
    /// Creates or truncates the destination and writes the header plus every row.
    fn write_table(&mut self, table: &Table) -> Result<SinkResult, ConvertError>;
}

#[derive(Debug)]
pub struct SinkResult {
    pub file_written: Utf8PathBuf,
    pub rows_written: u64,
}
