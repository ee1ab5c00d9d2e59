//! Turns uploaded `.xlsx` bytes into contact rows.
//!
//! Layout: first worksheet, header in the first row, then phone / name / company
//! in columns 1-3. Blank rows are skipped and blank cells become `"N/A"`.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx, XlsxError};
use thiserror::Error;

use crate::models::contact::{ContactRow, MISSING};

// Absolute sheet coordinates: row 1 is the header, columns A-C hold the data.
const HEADER_ROW: u32 = 0;
const PHONE_COL: u32 = 0;
const NAME_COL: u32 = 1;
const COMPANY_COL: u32 = 2;

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("could not read workbook: {0}")]
    Workbook(#[from] XlsxError),

    #[error("workbook has no worksheets")]
    NoWorksheet,
}

/// Parses an in-memory `.xlsx` workbook into contact rows.
pub fn parse_contacts(bytes: &[u8]) -> Result<Vec<ContactRow>, SpreadsheetError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;
    Ok(rows_from_range(&range))
}

/// Calamine trims the range to the used cells, so a sheet with column A or
/// row 1 empty does not start at (0, 0). Cells are read by absolute position.
fn rows_from_range(range: &Range<Data>) -> Vec<ContactRow> {
    let (Some((first_row, first_col)), Some((last_row, last_col))) = (range.start(), range.end())
    else {
        return Vec::new();
    };

    let is_blank_row =
        |r: u32| (first_col..=last_col).all(|c| range.get_value((r, c)).map_or(true, is_blank));

    (first_row.max(HEADER_ROW + 1)..=last_row)
        .filter(|&r| !is_blank_row(r))
        .map(|r| {
            ContactRow::new(
                cell_text(range.get_value((r, PHONE_COL))),
                cell_text(range.get_value((r, NAME_COL))),
                cell_text(range.get_value((r, COMPANY_COL))),
            )
        })
        .collect()
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) | Some(Data::Error(_)) => MISSING.to_string(),
        Some(Data::String(s)) if s.is_empty() => MISSING.to_string(),
        // Phones typed into a numeric cell come back as floats.
        Some(Data::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), value.clone());
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_header_row_is_skipped() {
        let range = sheet(&[
            &[s("Phone"), s("Name"), s("Company")],
            &[s("+7 (495) 123-45-67"), s("Ivanov"), s("Acme")],
        ]);
        let rows = rows_from_range(&range);
        assert_eq!(
            rows,
            vec![ContactRow::new("+7 (495) 123-45-67", "Ivanov", "Acme")]
        );
    }

    #[test]
    fn test_blank_cells_become_placeholder() {
        let range = sheet(&[
            &[s("Phone"), s("Name"), s("Company")],
            &[s("123"), Data::Empty, s("")],
            &[Data::Empty, s("Petrov"), Data::Empty],
        ]);
        let rows = rows_from_range(&range);
        assert_eq!(rows[0], ContactRow::new("123", MISSING, MISSING));
        assert_eq!(rows[1], ContactRow::new(MISSING, "Petrov", MISSING));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let range = sheet(&[
            &[s("Phone"), s("Name"), s("Company")],
            &[Data::Empty, Data::Empty, Data::Empty],
            &[s("1"), s("A"), s("B")],
        ]);
        assert_eq!(rows_from_range(&range).len(), 1);
    }

    #[test]
    fn test_numeric_phone_has_no_fraction() {
        let range = sheet(&[
            &[s("Phone"), s("Name"), s("Company")],
            &[Data::Float(74951234567.0), s("Ivanov"), Data::Int(42)],
        ]);
        let rows = rows_from_range(&range);
        assert_eq!(rows[0].phone, "74951234567");
        assert_eq!(rows[0].company, "42");
    }

    #[test]
    fn test_narrow_sheet_fills_missing_columns() {
        let range = sheet(&[&[s("Phone")], &[s("89161234567")]]);
        let rows = rows_from_range(&range);
        assert_eq!(rows, vec![ContactRow::new("89161234567", MISSING, MISSING)]);
    }

    #[test]
    fn test_offset_range_is_read_by_absolute_position() {
        // Used range B2:C3: header row is row 2, column A is empty.
        let mut range = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), s("Name"));
        range.set_value((1, 2), s("Company"));
        range.set_value((2, 1), s("Ivanov"));
        range.set_value((2, 2), s("Acme"));

        let rows = rows_from_range(&range);
        assert_eq!(rows, vec![ContactRow::new(MISSING, "Ivanov", "Acme")]);
    }

    #[test]
    fn test_empty_range_yields_no_rows() {
        assert!(rows_from_range(&Range::<Data>::empty()).is_empty());
    }

    fn workbook_bytes(build: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        build(workbook.add_worksheet());
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_parse_workbook() {
        let bytes = workbook_bytes(|sheet| {
            sheet.write_string(0, 0, "Phone").unwrap();
            sheet.write_string(0, 1, "Name").unwrap();
            sheet.write_string(0, 2, "Company").unwrap();
            sheet.write_string(1, 0, "+7 (495) 123-45-67").unwrap();
            sheet.write_string(1, 1, "Ivanov").unwrap();
            sheet.write_string(1, 2, "Acme").unwrap();
            sheet.write_number(2, 0, 88005553535.0).unwrap();
            sheet.write_string(2, 1, "Petrov").unwrap();
        });

        let rows = parse_contacts(&bytes).unwrap();
        assert_eq!(
            rows,
            vec![
                ContactRow::new("+7 (495) 123-45-67", "Ivanov", "Acme"),
                ContactRow::new("88005553535", "Petrov", MISSING),
            ]
        );
    }

    #[test]
    fn test_parse_workbook_with_empty_phone_column() {
        let bytes = workbook_bytes(|sheet| {
            sheet.write_string(0, 1, "Name").unwrap();
            sheet.write_string(0, 2, "Company").unwrap();
            sheet.write_string(1, 1, "Ivanov").unwrap();
            sheet.write_string(1, 2, "Acme").unwrap();
        });

        let rows = parse_contacts(&bytes).unwrap();
        assert_eq!(rows, vec![ContactRow::new(MISSING, "Ivanov", "Acme")]);
    }

    #[test]
    fn test_parse_workbook_with_blank_header_row() {
        let bytes = workbook_bytes(|sheet| {
            for (row, (phone, name, company)) in [("111", "A", "B"), ("222", "C", "D")]
                .into_iter()
                .enumerate()
            {
                let row = row as u32 + 1;
                sheet.write_string(row, 0, phone).unwrap();
                sheet.write_string(row, 1, name).unwrap();
                sheet.write_string(row, 2, company).unwrap();
            }
        });

        let rows = parse_contacts(&bytes).unwrap();
        assert_eq!(
            rows,
            vec![
                ContactRow::new("111", "A", "B"),
                ContactRow::new("222", "C", "D"),
            ]
        );
    }

    #[test]
    fn test_corrupt_bytes_are_rejected() {
        let err = parse_contacts(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, SpreadsheetError::Workbook(_)));
    }
}
