use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::{Summary, input::OutputArgs},
    context::RunContext,
    extract::{Bill, SettlementTemplate, extract_all},
    io::export::{ExportCell, Sheet},
    prelude::*,
    tables::build_settlement_table,
};

#[derive(Parser)]
pub struct ExtractArgs {
    /// Settlement bills: workbooks, CSV or text pages.
    #[clap(short = 'i', long = "input", num_args = 1..)]
    paths: Vec<PathBuf>,

    /// Sheet to read from workbook bills, the first one by default.
    #[clap(long, env = "INPUT_SHEET")]
    sheet: Option<String>,

    /// TOML template with the fields and the subject table, a built-in one by default.
    #[clap(long = "template", env = "TEMPLATE_PATH")]
    template_path: Option<PathBuf>,

    #[clap(flatten)]
    output: OutputArgs,
}

impl ExtractArgs {
    #[instrument(skip_all, fields(n_files = self.paths.len()))]
    pub fn run(self, context: &mut RunContext) -> Result<Option<Summary>> {
        let template = match &self.template_path {
            Some(path) => SettlementTemplate::read_from(path)?,
            None => SettlementTemplate::default(),
        };
        let bills = extract_all(&template, &self.paths, self.sheet.as_deref(), context)?;
        let field_names = template.field_names();
        println!("{}", build_settlement_table(&bills, &field_names));
        self.output.save(&[settlement_sheet(&bills, &field_names)])?;

        let n_matched = bills.iter().flat_map(|bill| &bill.lines).filter(|line| line.is_matched()).count();
        Ok(Some(Summary::new(format!("{} bills", bills.len()), format!("{n_matched} subjects matched"))))
    }
}

/// Unmatched subjects are flagged.
fn settlement_sheet(bills: &[Bill], field_names: &[&str]) -> Sheet {
    let mut sheet = Sheet::new("结算科目", ["文件", "科目"].into_iter().chain(field_names.iter().copied()));
    for bill in bills {
        for line in &bill.lines {
            sheet.push_row(
                [
                    ExportCell::plain(bill.source.as_str()),
                    ExportCell::flag_if(line.subject.as_str(), !line.is_matched()),
                ]
                .into_iter()
                .chain(line.values.iter().map(|value| ExportCell::plain(*value))),
            );
        }
    }
    sheet
}
