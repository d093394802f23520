pub mod test_data {
    use std::path::Path;

    use calamine::{Reader, Xlsx, open_workbook};
    use camino::Utf8Path;
    use rust_xlsxwriter::Workbook;

    use crate::sources::{TableSource, xlsx::XlsxSource};

    pub fn write_text_file(path: &Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }

    /// Writes a single-sheet workbook where every cell is a string.
    pub fn write_xlsx_strings(path: &Path, rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                worksheet
                    .write_string(row as u32, col as u16, *value)
                    .unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    /// Reads the first worksheet, header included, as display text.
    pub fn read_xlsx_sheet(path: &Path) -> Vec<Vec<String>> {
        let table = XlsxSource::new(Utf8Path::from_path(path).unwrap())
            .read_table()
            .unwrap();
        table.records().map(<[String]>::to_vec).collect()
    }

    /// The 0-based end cell of the first worksheet's `<dimension>`.
    pub fn sheet_dimension_end(path: &Path) -> (u32, u32) {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let sheet_name = workbook.sheet_names()[0].clone();
        let reader = workbook.worksheet_cells_reader(&sheet_name).unwrap();
        reader.dimensions().end
    }

    pub fn sheet_names(path: &Path) -> Vec<String> {
        let workbook: Xlsx<_> = open_workbook(path).unwrap();
        workbook.sheet_names()
    }
}
