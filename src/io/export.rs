//! Output tables, saved as a multi-sheet workbook or as CSV files.

use std::{fs::File, io::BufWriter, path::Path};

use crate::{
    core::series::HourlySeries,
    io::{cell::Cell, csv, series::SLOT_COLUMN, xlsx},
    prelude::*,
};

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ExportCell {
    pub cell: Cell,

    /// Highlighted in the output, used for negative deviations and losses.
    pub flagged: bool,
}

impl ExportCell {
    pub fn flag_if(cell: impl Into<Cell>, flagged: bool) -> Self {
        Self { cell: cell.into(), flagged }
    }

    pub fn plain(cell: impl Into<Cell>) -> Self {
        Self::flag_if(cell, false)
    }
}

pub struct SeriesColumn<'a> {
    pub name: &'a str,
    pub series: &'a HourlySeries,
    pub flag_negative: bool,
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<ExportCell>>,
}

impl Sheet {
    pub fn new<S: Into<String>>(name: impl Into<String>, header: impl IntoIterator<Item = S>) -> Self {
        Self { name: name.into(), header: header.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: impl IntoIterator<Item = ExportCell>) {
        self.rows.push(row.into_iter().collect());
    }

    /// Slot number column followed by one column per series.
    pub fn from_series(name: impl Into<String>, columns: &[SeriesColumn<'_>]) -> Self {
        let mut sheet =
            Self::new(name, [SLOT_COLUMN].into_iter().chain(columns.iter().map(|column| column.name)));
        let n_slots = columns.iter().map(|column| column.series.n_slots()).max().unwrap_or_default();
        for slot in 0..n_slots {
            let values = columns.iter().map(|column| {
                let value = column.series.as_slice().get(slot).copied();
                ExportCell::flag_if(value, column.flag_negative && value.is_some_and(|value| value < 0.0))
            });
            #[expect(clippy::cast_precision_loss)]
            let slot_number = ExportCell::plain((slot + 1) as f64);
            sheet.push_row([slot_number].into_iter().chain(values));
        }
        sheet
    }
}

/// Save the sheets, the format follows the extension.
///
/// Several sheets saved as CSV land in one file per sheet, named after the
/// sheet.
#[instrument(skip_all, fields(path = %path.display(), n_sheets = sheets.len()))]
pub fn save(path: &Path, sheets: &[Sheet]) -> Result {
    ensure!(!sheets.is_empty(), "nothing to export");
    let extension =
        path.extension().and_then(|extension| extension.to_str()).map(str::to_lowercase).unwrap_or_default();
    match extension.as_str() {
        "xlsx" => xlsx::save(path, sheets)?,
        "csv" => {
            if let [sheet] = sheets {
                save_csv(path, sheet)?;
            } else {
                let stem = path.file_stem().map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
                for sheet in sheets {
                    save_csv(&path.with_file_name(format!("{stem}_{}.csv", sheet.name)), sheet)?;
                }
            }
        }
        _ => bail!("unsupported output format `{}`, use `.xlsx` or `.csv`", path.display()),
    }
    info!("saved");
    Ok(())
}

fn save_csv(path: &Path, sheet: &Sheet) -> Result {
    let file = File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?;
    csv::write_sheet(BufWriter::new(file), sheet)
}
