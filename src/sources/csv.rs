use std::{fs::File, io::BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use csv::ReaderBuilder;
use tracing::debug;

use crate::{error::ConvertError, sources::TableSource, table::Table};

/// Reads a comma-separated file whose first record is the header.
pub struct CsvSource {
    path: Utf8PathBuf,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Utf8Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }
}

impl TableSource for CsvSource {
    fn name(&self) -> &str {
        self.path.as_str()
    }

    fn read_table(&self) -> Result<Table, ConvertError> {
        let file = File::open(&self.path).map_err(|e| ConvertError::io(&self.path, e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let headers = reader.headers()?.iter().map(str::to_owned).collect();
        let mut table = Table::new(headers);

        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_owned).collect());
        }

        debug!(
            path = %self.path,
            columns = table.num_columns(),
            rows = table.num_rows(),
            "read csv"
        );

        Ok(table)
    }
}
