//! Workbook sink: persists rendered tables as a single .xlsx file, one
//! worksheet per table.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Table, TableColumn, TableStyle, Workbook, Worksheet, XlsxError};

use crate::table::format::{ACCOUNTING_FORMAT, DATE_FORMAT};
use crate::table::{CellStyle, CellValue, RenderedTable};

/// Write one workbook with a worksheet per rendered table and save it to
/// `path`.
pub fn write_workbook(path: &Path, tables: &[RenderedTable]) -> Result<()> {
    let mut workbook = Workbook::new();
    for table in tables {
        let sheet = workbook.add_worksheet();
        write_sheet(sheet, table)
            .with_context(|| format!("Failed to build worksheet '{}'", table.sheet_name))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook to {}", path.display()))?;
    Ok(())
}

fn write_sheet(sheet: &mut Worksheet, table: &RenderedTable) -> Result<(), XlsxError> {
    sheet.set_name(&table.sheet_name)?;

    let accounting_format = Format::new().set_num_format(ACCOUNTING_FORMAT);
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_index = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let col_index = c as u16;
            let format = match cell.style {
                CellStyle::Default => None,
                CellStyle::Accounting => Some(&accounting_format),
                CellStyle::Date => Some(&date_format),
            };
            match (&cell.value, format) {
                (CellValue::Empty, _) => {}
                (CellValue::Bool(b), _) => {
                    sheet.write_boolean(row_index, col_index, *b)?;
                }
                (CellValue::Number(n), Some(format)) => {
                    sheet.write_number_with_format(row_index, col_index, *n, format)?;
                }
                (CellValue::Number(n), None) => {
                    sheet.write_number(row_index, col_index, *n)?;
                }
                (CellValue::Text(s), Some(format)) => {
                    sheet.write_string_with_format(row_index, col_index, s, format)?;
                }
                (CellValue::Text(s), None) => {
                    sheet.write_string(row_index, col_index, s)?;
                }
                (CellValue::Date(dt), _) => {
                    sheet.write_datetime_with_format(row_index, col_index, dt, &date_format)?;
                }
            }
        }
    }

    // The xlsx table model requires at least one data row, so the range of
    // an empty table pads one blank row below the header.
    let header_columns: Vec<TableColumn> = table
        .columns
        .iter()
        .map(|name| TableColumn::new().set_header(name))
        .collect();
    let banded = Table::new()
        .set_style(TableStyle::Medium21)
        .set_columns(&header_columns);
    let last_row = table.last_row().max(1);
    sheet.add_table(0, 0, last_row, table.last_column(), &banded)?;

    sheet.autofit();
    Ok(())
}
