/// An in-memory table of text values.
///
/// The header names the columns. Every data row holds exactly one value
/// per header column, aligned by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a data row. Callers build rows at the header's width; the
    /// csv reader already rejects ragged records.
    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(
            row.len(),
            self.headers.len(),
            "row {} doesn't match the header width",
            self.rows.len() + 2
        );
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// True when there's no header at all (and so no data either).
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// The header followed by every data row, in order.
    ///
    /// Yields nothing for a table with no header.
    pub fn records(&self) -> impl Iterator<Item = &[String]> {
        let header = (!self.is_empty()).then_some(self.headers.as_slice());
        header
            .into_iter()
            .chain(self.rows.iter().map(Vec::as_slice))
    }
}
