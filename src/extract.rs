//! Settlement bill extraction: subject rows mapped onto canonical subjects.

pub mod layout;
pub mod template;

use std::{collections::HashMap, path::PathBuf};

use itertools::Itertools;

pub use self::template::{SettlementTemplate, Subject};
use crate::{
    context::RunContext,
    extract::layout::HeaderLayout,
    io::{Row, cell::Cell, read_table, schema::SchemaError},
    prelude::*,
};

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct SettlementLine {
    pub subject: String,

    /// Bill row the values came from, `None` when no row matched the subject.
    pub row: Option<usize>,

    /// One value per template field, `None` for placeholders and blanks.
    pub values: Vec<Option<f64>>,
}

impl SettlementLine {
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.row.is_some()
    }
}

/// Lines extracted from one bill.
#[must_use]
#[derive(Clone, Debug)]
pub struct Bill {
    pub source: String,
    pub lines: Vec<SettlementLine>,
}

/// Extract one line per canonical subject from the bill rows.
///
/// The first row classified as a subject wins. A row is classified by its
/// subject cell, falling back to the whole row text.
pub fn extract(template: &SettlementTemplate, rows: &[Row]) -> Result<Vec<SettlementLine>, SchemaError> {
    let layout = HeaderLayout::locate(template, rows)?;
    let mut first_rows = HashMap::new();
    for (index, row) in rows.iter().enumerate().skip(layout.header_row + 1) {
        let subject_cell = row.get(layout.subject_column).map(Cell::to_string).unwrap_or_default();
        let subject = match template.classify(&subject_cell) {
            Subject::Unmatched => template.classify(&row.iter().join(" ")),
            matched @ Subject::Matched(_) => matched,
        };
        if let Subject::Matched(canonical) = subject {
            first_rows.entry(canonical).or_insert(index);
        }
    }
    Ok(template
        .canonical_subjects()
        .into_iter()
        .map(|subject| {
            let row = first_rows.get(subject).copied();
            let values = layout
                .field_columns
                .iter()
                .map(|column| row.and_then(|row| rows[row].get(*column)).and_then(Cell::as_number))
                .collect();
            SettlementLine { subject: subject.to_owned(), row, values }
        })
        .collect())
}

/// Extract every bill, failing files are reported and skipped.
#[instrument(skip_all, fields(n_files = paths.len()))]
pub fn extract_all(
    template: &SettlementTemplate,
    paths: &[PathBuf],
    sheet: Option<&str>,
    context: &mut RunContext,
) -> Result<Vec<Bill>> {
    ensure!(!paths.is_empty(), "no bills to extract");
    let mut bills = Vec::with_capacity(paths.len());
    for path in paths {
        let source = path.display().to_string();
        let lines = read_table(path, sheet)
            .and_then(|(_, rows)| extract(template, &rows).map_err(Error::from));
        match lines {
            Ok(lines) => {
                let n_matched = lines.iter().filter(|line| line.is_matched()).count();
                info!(%source, n_matched, n_subjects = lines.len(), "extracted");
                bills.push(Bill { source, lines });
            }
            Err(error) => context.warn(source, format!("{error:#}")),
        }
    }
    Ok(bills)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;
    use crate::io::text::rows_from_text;

    const BILL: &str = "
        某某光伏电站 2024年3月 电费结算单
        序号 结算科目 结算电量 结算均价 结算电费
        1 中长期合约 1,200.5 350 420175
        2 现货日前 300 / --
        3 中长期合约调整 10 1 10
        4 其他 — — —
        合计 偏差考核费用 0 0 -25
    ";

    #[test]
    fn test_extract() {
        let template = SettlementTemplate::default();
        let lines = extract(&template, &rows_from_text(BILL)).unwrap();
        assert_eq!(lines.len(), template.canonical_subjects().len());

        let contract = lines.iter().find(|line| line.subject == "中长期合约").unwrap();
        assert_eq!(contract.row, Some(2));
        assert_eq!(contract.values, [Some(1200.5), Some(350.0), Some(420_175.0)]);

        let day_ahead = lines.iter().find(|line| line.subject == "现货日前").unwrap();
        assert_eq!(day_ahead.values, [Some(300.0), None, None]);

        let deviation = lines.iter().find(|line| line.subject == "偏差考核").unwrap();
        assert_eq!(deviation.values, [Some(0.0), Some(0.0), Some(-25.0)]);
    }

    #[test]
    fn test_unmatched_subjects_are_explicit() {
        let template = SettlementTemplate::default();
        let lines = extract(&template, &rows_from_text(BILL)).unwrap();
        let reserve = lines.iter().find(|line| line.subject == "辅助服务分摊").unwrap();
        assert!(!reserve.is_matched());
        assert_eq!(reserve.values, [None, None, None]);
    }

    #[test]
    fn test_extract_all_skips_failing_files() -> Result {
        let directory = tempfile::tempdir()?;
        let good = directory.path().join("good.txt");
        fs::write(&good, BILL)?;
        let headless = directory.path().join("headless.txt");
        fs::write(&headless, "nothing to see here")?;
        let paths = vec![good, headless, directory.path().join("missing.txt")];

        let mut context = RunContext::builder().build();
        let bills = extract_all(&SettlementTemplate::default(), &paths, None, &mut context)?;

        assert_eq!(bills.len(), 1);
        assert!(Path::new(&bills[0].source).ends_with("good.txt"));
        assert_eq!(context.warnings().len(), 2);
        Ok(())
    }

    #[test]
    fn test_extract_all_requires_files() {
        let mut context = RunContext::builder().build();
        assert!(extract_all(&SettlementTemplate::default(), &[], None, &mut context).is_err());
    }
}
