use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::{
    io::{
        cell::Cell,
        export::{ExportCell, Sheet},
    },
    prelude::*,
};

pub fn save(path: &Path, sheets: &[Sheet]) -> Result {
    build(sheets)?.save(path).with_context(|| format!("failed to save `{}`", path.display()))
}

fn build(sheets: &[Sheet]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let flagged_format = Format::new().set_background_color(Color::Yellow);
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).with_context(|| format!("invalid sheet name `{}`", sheet.name))?;
        for (column, title) in sheet.header.iter().enumerate() {
            worksheet.write_string_with_format(0, u16::try_from(column)?, title, &header_format)?;
        }
        for (row, cells) in sheet.rows.iter().enumerate() {
            let row = u32::try_from(row + 1)?;
            for (column, cell) in cells.iter().enumerate() {
                write_cell(worksheet, row, u16::try_from(column)?, cell, &flagged_format)?;
            }
        }
    }
    Ok(workbook)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    column: u16,
    cell: &ExportCell,
    flagged_format: &Format,
) -> Result {
    match (&cell.cell, cell.flagged) {
        (Cell::Empty, false) => {}
        (Cell::Empty, true) => {
            worksheet.write_blank(row, column, flagged_format)?;
        }
        (Cell::Number(number), false) => {
            worksheet.write_number(row, column, *number)?;
        }
        (Cell::Number(number), true) => {
            worksheet.write_number_with_format(row, column, *number, flagged_format)?;
        }
        (Cell::Text(text), false) => {
            worksheet.write_string(row, column, text)?;
        }
        (Cell::Text(text), true) => {
            worksheet.write_string_with_format(row, column, text, flagged_format)?;
        }
    }
    Ok(())
}
