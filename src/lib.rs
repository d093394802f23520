pub mod commands;
pub mod error;
pub mod sinks;
pub mod sources;
pub mod table;
pub mod utils;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use strum_macros::Display;

use crate::{
    error::ConvertError,
    sinks::{TableSink, csv::CsvSink, xlsx::XlsxSink},
    sources::{TableSource, csv::CsvSource, xlsx::XlsxSource},
};

pub const BIN_NAME: &str = "table-convertor";

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Parser, Debug)]
#[command(
    name = BIN_NAME,
    version = VERSION,
    about,
    long_about = None,
    override_usage = "table-convertor <input_file> <output_file>"
)]
pub struct Cli {
    /// The input file followed by the output file.
    ///
    /// Supported conversions are CSV to XLSX and XLSX to CSV, chosen by
    /// file extension.
    #[arg(value_name = "FILE")]
    pub files: Vec<Utf8PathBuf>,
}

impl Cli {
    /// Splits the positional paths into input and output, rejecting any
    /// count other than two.
    pub fn into_args(self) -> Result<ConvertArgs, ConvertError> {
        let [input, output]: [Utf8PathBuf; 2] = self
            .files
            .try_into()
            .map_err(|_| ConvertError::Usage)?;
        Ok(ConvertArgs { input, output })
    }
}

#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    /// Detects the format from the path's extension, ignoring case.
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let ext = path.extension()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(TableFormat::Csv)
        } else if ext.eq_ignore_ascii_case("xlsx") {
            Some(TableFormat::Xlsx)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conversion {
    CsvToXlsx,
    XlsxToCsv,
}

impl Conversion {
    pub fn detect(input: &Utf8Path, output: &Utf8Path) -> Result<Self, ConvertError> {
        match (TableFormat::from_path(input), TableFormat::from_path(output)) {
            (Some(TableFormat::Csv), Some(TableFormat::Xlsx)) => Ok(Conversion::CsvToXlsx),
            (Some(TableFormat::Xlsx), Some(TableFormat::Csv)) => Ok(Conversion::XlsxToCsv),
            _ => Err(ConvertError::UnsupportedFormat {
                input: input.to_owned(),
                output: output.to_owned(),
            }),
        }
    }

    pub fn from_format(&self) -> TableFormat {
        match self {
            Conversion::CsvToXlsx => TableFormat::Csv,
            Conversion::XlsxToCsv => TableFormat::Xlsx,
        }
    }

    pub fn to_format(&self) -> TableFormat {
        match self {
            Conversion::CsvToXlsx => TableFormat::Xlsx,
            Conversion::XlsxToCsv => TableFormat::Csv,
        }
    }

    pub fn source(&self, input: &Utf8Path) -> Box<dyn TableSource> {
        match self {
            Conversion::CsvToXlsx => Box::new(CsvSource::new(input)),
            Conversion::XlsxToCsv => Box::new(XlsxSource::new(input)),
        }
    }

    pub fn sink(&self, output: &Utf8Path) -> Box<dyn TableSink> {
        match self {
            Conversion::CsvToXlsx => Box::new(XlsxSink::new(output)),
            Conversion::XlsxToCsv => Box::new(CsvSink::new(output)),
        }
    }

    pub fn success_message(&self) -> String {
        format!(
            "{} file has been successfully converted to {}.",
            self.from_format(),
            self.to_format()
        )
    }
}
