use std::{fs::File, io::BufWriter};

use camino::{Utf8Path, Utf8PathBuf};
use csv::{Terminator, WriterBuilder};
use tracing::debug;

use crate::{
    error::ConvertError,
    sinks::{SinkResult, TableSink},
    table::Table,
};

pub struct CsvSink {
    path: Utf8PathBuf,
}

impl CsvSink {
    pub fn new(path: impl AsRef<Utf8Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }
}

impl TableSink for CsvSink {
    fn write_table(&mut self, table: &Table) -> Result<SinkResult, ConvertError> {
        let file = File::create(&self.path).map_err(|e| ConvertError::io(&self.path, e))?;
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(file));

        for record in table.records() {
            writer.write_record(record)?;
        }
        writer.flush().map_err(|e| ConvertError::io(&self.path, e))?;

        debug!(path = %self.path, rows = table.num_rows(), "wrote csv");

        Ok(SinkResult {
            file_written: self.path.clone(),
            rows_written: table.num_rows() as u64,
        })
    }
}
