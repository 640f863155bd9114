use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

use crate::{
    context::RunContext,
    core::slot::Month,
    io::{Row, cell::Cell},
    prelude::*,
};

/// Spreadsheet opened for reading, any format `calamine` recognizes.
pub struct Workbook(Sheets<BufReader<File>>);

impl Workbook {
    pub fn open(path: &Path) -> Result<Self> {
        let sheets = open_workbook_auto(path)
            .with_context(|| format!("failed to open the workbook `{}`", path.display()))?;
        Ok(Self(sheets))
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        self.0.sheet_names()
    }

    pub fn read_sheet(&mut self, name: &str) -> Result<Vec<Row>> {
        let range =
            self.0.worksheet_range(name).with_context(|| format!("failed to read the sheet `{name}`"))?;
        Ok(rows_from_range(&range))
    }

    pub fn read_first_sheet(&mut self) -> Result<(String, Vec<Row>)> {
        let name = self.sheet_names().into_iter().next().context("the workbook has no sheets")?;
        let rows = self.read_sheet(&name)?;
        Ok((name, rows))
    }

    /// Read the `1月`..`12月` sheets, other sheets are reported and skipped.
    #[instrument(skip_all)]
    pub fn read_month_sheets(&mut self, context: &mut RunContext) -> Result<BTreeMap<Month, Vec<Row>>> {
        let mut sheets = BTreeMap::new();
        for name in self.sheet_names() {
            let Some(month) = Month::from_sheet_name(&name) else {
                context.warn(name, "not a month sheet");
                continue;
            };
            let rows = self.read_sheet(&name)?;
            debug!(%month, n_rows = rows.len(), "read the month sheet");
            sheets.insert(month, rows);
        }
        Ok(sheets)
    }
}

pub fn rows_from_range(range: &Range<Data>) -> Vec<Row> {
    range.rows().map(|row| row.iter().map(Cell::from).collect()).collect()
}
