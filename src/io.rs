//! Loading tables from workbooks, CSV and bill text, and exporting results.

pub mod cell;
pub mod csv;
pub mod export;
pub mod schema;
pub mod series;
pub mod text;
pub mod workbook;
pub mod xlsx;

use std::{fs, fs::File, io::BufReader, path::Path};

use crate::{
    io::{cell::Cell, workbook::Workbook},
    prelude::*,
};

pub type Row = Vec<Cell>;

/// Input kinds recognized by the file extension.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Format {
    Workbook,
    Csv,
    Text,
}

impl Format {
    pub fn of(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_lowercase)
            .with_context(|| format!("`{}` has no file extension", path.display()))?;
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Text),
            _ => bail!("unsupported input format `.{extension}`"),
        }
    }
}

/// Read one table from any supported input.
///
/// Returns the sheet name (or the file stem) together with the rows. The sheet
/// is only meaningful for workbooks, which default to their first sheet.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<(String, Vec<Row>)> {
    let stem = path.file_stem().map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
    let (name, rows) = match Format::of(path)? {
        Format::Workbook => {
            let mut workbook = Workbook::open(path)?;
            match sheet {
                Some(sheet) => (sheet.to_owned(), workbook.read_sheet(sheet)?),
                None => workbook.read_first_sheet()?,
            }
        }
        Format::Csv => {
            let file = File::open(path)
                .with_context(|| format!("failed to open `{}`", path.display()))?;
            (stem, csv::read_rows(BufReader::new(file))?)
        }
        Format::Text => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            (stem, text::rows_from_text(&text))
        }
    };
    debug!(%name, n_rows = rows.len(), "read the table");
    Ok((name, rows))
}
