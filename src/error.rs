//! Error kinds surfaced at the process boundary.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::BIN_NAME;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("expected exactly two arguments: <input_file> <output_file>")]
    Usage,

    #[error("unsupported conversion from '{input}' to '{output}'")]
    UnsupportedFormat {
        input: Utf8PathBuf,
        output: Utf8PathBuf,
    },

    #[error("{path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Workbook(String),
}

impl ConvertError {
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn workbook(message: impl Into<String>) -> Self {
        ConvertError::Workbook(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::Usage => 2,
            ConvertError::UnsupportedFormat { .. } => 3,
            ConvertError::Io { .. } => 4,
            ConvertError::Csv(err) if err.is_io_error() => 4,
            ConvertError::Csv(_) | ConvertError::Workbook(_) => 5,
        }
    }

    /// The text printed to stdout for this outcome.
    pub fn console_message(&self) -> String {
        match self {
            ConvertError::Usage => format!("Usage:\n{BIN_NAME} <input_file> <output_file>"),
            ConvertError::UnsupportedFormat { .. } => {
                "Unsupported file formats.\nSupported conversions:\nCSV to XLSX\nXLSX to CSV"
                    .to_string()
            }
            other => format!("An error occurred: {other}"),
        }
    }
}
