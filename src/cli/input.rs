use std::path::PathBuf;

use clap::Parser;

use crate::{
    context::RunContext,
    core::series::HourlySeries,
    io::{
        Row,
        export::{self, Sheet},
        read_table,
        series::{read_history, read_series},
    },
    prelude::*,
};

#[derive(Parser)]
pub struct InputArgs {
    /// Workbook, CSV or text file to read.
    #[clap(id = "input", short = 'i', long = "input", env = "INPUT_PATH")]
    pub path: PathBuf,

    /// Sheet to read, the first one by default.
    #[clap(long, env = "INPUT_SHEET")]
    pub sheet: Option<String>,
}

impl InputArgs {
    /// Read the named columns of a `时段`-keyed table.
    pub fn read_series(&self, columns: &[&str], context: &mut RunContext) -> Result<Vec<HourlySeries>> {
        let (scope, rows) = self.read()?;
        read_series(&rows, columns, &scope, context).with_context(|| format!("failed to load `{scope}`"))
    }

    /// Average a `时间`-keyed history column into a typical day.
    pub fn read_history(&self, column: &str, context: &mut RunContext) -> Result<HourlySeries> {
        let (scope, rows) = self.read()?;
        read_history(&rows, column, &scope, context).with_context(|| format!("failed to load `{scope}`"))
    }

    fn read(&self) -> Result<(String, Vec<Row>)> {
        let (name, rows) = read_table(&self.path, self.sheet.as_deref())?;
        Ok((format!("{}:{name}", self.path.display()), rows))
    }
}

#[derive(Parser)]
pub struct OutputArgs {
    /// Save the result, `.xlsx` or `.csv`.
    #[clap(id = "output", short = 'o', long = "output", env = "OUTPUT_PATH")]
    pub path: Option<PathBuf>,
}

impl OutputArgs {
    pub fn save(&self, sheets: &[Sheet]) -> Result {
        match &self.path {
            Some(path) => export::save(path, sheets),
            None => Ok(()),
        }
    }
}
