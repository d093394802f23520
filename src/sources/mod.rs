pub mod csv;
pub mod xlsx;

use crate::{error::ConvertError, table::Table};

pub trait TableSource {
    fn name(&self) -> &str;

    /// Loads the whole source into memory.
    fn read_table(&self) -> Result<Table, ConvertError>;
}
