use std::{fs::File, io::BufReader};

use calamine::{Data, ExcelDateTime, Reader, Xlsx};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Timelike;
use tracing::debug;

use crate::{
    error::ConvertError,
    sources::TableSource,
    table::Table,
    utils::magic::is_zip_archive,
};

/// Reads the first worksheet of a workbook, bounded by the sheet's declared
/// `<dimension>`.
pub struct XlsxSource {
    path: Utf8PathBuf,
}

impl XlsxSource {
    pub fn new(path: impl AsRef<Utf8Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    fn open_workbook(&self) -> Result<Xlsx<BufReader<File>>, ConvertError> {
        let mut file = File::open(&self.path).map_err(|e| ConvertError::io(&self.path, e))?;

        if !is_zip_archive(&mut file).map_err(|e| ConvertError::io(&self.path, e))? {
            return Err(ConvertError::workbook(format!(
                "'{}' is not a valid XLSX workbook",
                self.path
            )));
        }

        Xlsx::new(BufReader::new(file)).map_err(|e| {
            ConvertError::workbook(format!("failed to open workbook '{}': {e}", self.path))
        })
    }
}

impl TableSource for XlsxSource {
    fn name(&self) -> &str {
        self.path.as_str()
    }

    fn read_table(&self) -> Result<Table, ConvertError> {
        let mut workbook = self.open_workbook()?;

        let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
            ConvertError::workbook(format!("workbook '{}' has no worksheets", self.path))
        })?;
        let sheet_error = |e: calamine::XlsxError| {
            ConvertError::workbook(format!(
                "failed to read worksheet '{sheet_name}' in '{}': {e}",
                self.path
            ))
        };

        let mut reader = workbook
            .worksheet_cells_reader(&sheet_name)
            .map_err(sheet_error)?;
        let declared_end = reader.dimensions().end;

        let mut cells = Vec::new();
        while let Some(cell) = reader.next_cell().map_err(sheet_error)? {
            cells.push((cell.get_position(), Data::from(cell.get_value().clone())));
        }

        let table = cells_to_table(declared_end, cells).ok_or_else(|| {
            ConvertError::workbook(format!(
                "the first worksheet in '{}' has no defined dimension",
                self.path
            ))
        })?;

        debug!(
            path = %self.path,
            columns = table.num_columns(),
            rows = table.num_rows(),
            "read xlsx"
        );

        Ok(table)
    }
}

/// Lays the cells out on a grid from A1 through the declared end cell,
/// widened if any cell falls outside it. Returns `None` for a sheet with no
/// cells at all.
fn cells_to_table(declared_end: (u32, u32), cells: Vec<((u32, u32), Data)>) -> Option<Table> {
    if cells.is_empty() {
        return None;
    }

    let (last_row, last_col) = cells
        .iter()
        .fold(declared_end, |(r, c), ((row, col), _)| (r.max(*row), c.max(*col)));

    let mut grid = vec![vec![String::new(); last_col as usize + 1]; last_row as usize + 1];
    for ((row, col), value) in cells {
        grid[row as usize][col as usize] = cell_text(&value);
    }

    let mut rows = grid.into_iter();
    let mut table = Table::new(rows.next()?);
    for row in rows {
        table.push_row(row);
    }

    Some(table)
}

/// Renders a cell the way a spreadsheet displays it.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => number_text(*f),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => datetime_text(dt),
        Data::Error(e) => e.to_string(),
    }
}

/// Plain decimals in the usual range, otherwise exponent notation as the
/// General number format shows it (`1E+21`, `1.5E-10`).
fn number_text(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() || (1e-9..1e21).contains(&value.abs()) {
        return value.to_string();
    }

    let scientific = format!("{value:E}");
    match scientific.split_once('E') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        None => scientific,
    }
}

fn datetime_text(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        return number_text(value.as_f64());
    }

    match value.as_datetime() {
        Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => number_text(value.as_f64()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::test_data::{write_text_file, write_xlsx_strings};
    use calamine::CellErrorType;
    use rust_xlsxwriter::{Format, Workbook};
    use tempfile::TempDir;

    #[test]
    fn test_cell_text_renders_scalars() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Alice".into())), "Alice");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Float(30.0)), "30");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_text(&Data::Bool(false)), "FALSE");
        assert_eq!(cell_text(&Data::Error(CellErrorType::Div0)), "#DIV/0!");
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-01-15T10:30:00".into())),
            "2024-01-15T10:30:00"
        );
    }

    #[test]
    fn test_number_text_switches_to_exponent_at_extremes() {
        assert_eq!(number_text(0.0), "0");
        assert_eq!(number_text(-0.0), "0");
        assert_eq!(number_text(123456.0), "123456");
        assert_eq!(number_text(-7.25), "-7.25");
        assert_eq!(number_text(1e-9), "0.000000001");
        assert_eq!(number_text(1e21), "1E+21");
        assert_eq!(number_text(-2.5e22), "-2.5E+22");
        assert_eq!(number_text(1.5e-10), "1.5E-10");
        assert_eq!(number_text(1e100), "1E+100");
    }

    #[test]
    fn test_cells_to_table_spans_declared_dimension() {
        // cells only at A1 and B2, declared end at C3
        let cells = vec![
            ((0, 0), Data::String("a".into())),
            ((1, 1), Data::Empty),
        ];

        let table = cells_to_table((2, 2), cells).unwrap();

        assert_eq!(table.headers(), ["a", "", ""]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows()[0], ["", "", ""]);
        assert_eq!(table.rows()[1], ["", "", ""]);
    }

    #[test]
    fn test_cells_to_table_widens_to_cells_outside_dimension() {
        let cells = vec![((0, 0), Data::Int(1)), ((1, 2), Data::Int(2))];

        let table = cells_to_table((0, 0), cells).unwrap();

        assert_eq!(table.headers(), ["1", "", ""]);
        assert_eq!(table.rows(), [vec!["".to_string(), "".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_cells_to_table_without_cells_is_none() {
        assert!(cells_to_table((0, 0), Vec::new()).is_none());
    }

    #[test]
    fn test_trailing_blank_cells_extend_the_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blanks.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let text = Format::new().set_num_format("@");
        sheet.write_string(0, 0, "a").unwrap();
        sheet.write_blank(0, 1, &text).unwrap();
        sheet.write_string(1, 0, "1").unwrap();
        sheet.write_blank(2, 0, &text).unwrap();
        workbook.save(&path).unwrap();

        let table = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap();

        assert_eq!(table.headers(), ["a", ""]);
        assert_eq!(table.rows()[0], ["1", ""]);
        assert_eq!(table.rows()[1], ["", ""]);
    }

    #[test]
    fn test_reads_first_worksheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("people.xlsx");
        write_xlsx_strings(&path, &[&["name", "age"], &["Alice", "30"], &["Bob", "25"]]);

        let table = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap();

        assert_eq!(table.headers(), ["name", "age"]);
        assert_eq!(table.rows()[0], ["Alice", "30"]);
        assert_eq!(table.rows()[1], ["Bob", "25"]);
    }

    #[test]
    fn test_only_first_worksheet_is_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("two_sheets.xlsx");

        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.set_name("Data").unwrap();
        first.write_string(0, 0, "first").unwrap();
        let second = workbook.add_worksheet();
        second.set_name("Other").unwrap();
        second.write_string(0, 0, "second").unwrap();
        workbook.save(&path).unwrap();

        let table = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap();

        assert_eq!(table.headers(), ["first"]);
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_renders_typed_cells_as_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("typed.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "count").unwrap();
        sheet.write_string(0, 1, "ratio").unwrap();
        sheet.write_string(0, 2, "active").unwrap();
        sheet.write_string(0, 3, "day").unwrap();
        sheet.write_number(1, 0, 30).unwrap();
        sheet.write_number(1, 1, 0.25).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        let date = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        sheet
            .write_datetime_with_format(1, 3, &date, &Format::new().set_num_format("yyyy-mm-dd"))
            .unwrap();
        workbook.save(&path).unwrap();

        let table = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap();

        assert_eq!(table.rows()[0], ["30", "0.25", "TRUE", "2024-01-15"]);
    }

    #[test]
    fn test_gaps_inside_used_range_become_empty_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sparse.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "a").unwrap();
        sheet.write_string(0, 1, "b").unwrap();
        sheet.write_string(0, 2, "c").unwrap();
        sheet.write_string(2, 2, "z").unwrap();
        workbook.save(&path).unwrap();

        let table = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows()[0], ["", "", ""]);
        assert_eq!(table.rows()[1], ["", "", "z"]);
    }

    #[test]
    fn test_leading_empty_columns_are_kept() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(1, 1, "x").unwrap();
        workbook.save(&path).unwrap();

        let table = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap();

        assert_eq!(table.headers(), ["", ""]);
        assert_eq!(table.rows(), [vec!["".to_string(), "x".to_string()]]);
    }

    #[test]
    fn test_empty_worksheet_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        workbook.save(&path).unwrap();

        let err = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap_err();

        assert!(err.to_string().contains("no defined dimension"));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_non_zip_input_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.xlsx");
        write_text_file(&path, "name,age\nAlice,30\n");

        let err = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap_err();

        assert!(err.to_string().contains("not a valid XLSX workbook"));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_corrupt_zip_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.xlsx");
        std::fs::write(&path, b"PK\x03\x04 definitely not a workbook").unwrap();

        let err = XlsxSource::new(Utf8Path::from_path(&path).unwrap())
            .read_table()
            .unwrap_err();

        assert!(matches!(err, ConvertError::Workbook(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = XlsxSource::new("/non/existent/file.xlsx")
            .read_table()
            .unwrap_err();

        assert!(matches!(err, ConvertError::Io { .. }));
    }
}
