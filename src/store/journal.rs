use std::{fs::OpenOptions, io::Write, path::Path};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::prelude::*;

/// One run in the journal.
#[derive(Clone, Debug, Serialize)]
pub struct Entry {
    pub timestamp: DateTime<Local>,
    pub command: String,
    pub subject: String,
    pub figure: String,
}

/// Append the entry, starting the file with a BOM and a header row.
#[instrument(skip_all, fields(path = %path.display(), command = %entry.command))]
pub fn append(path: &Path, entry: &Entry) -> Result {
    let is_new = !path.is_file() || path.metadata()?.len() == 0;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open the journal `{}`", path.display()))?;
    if is_new {
        write!(file, "\u{feff}")?;
    }
    let mut writer = csv::WriterBuilder::new().has_headers(is_new).from_writer(file);
    writer.serialize(entry)?;
    writer.flush()?;
    debug!("appended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_append() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("journal.csv");
        for figure in ["2400 MWh", "-12 MWh"] {
            let entry = Entry {
                timestamp: Local::now(),
                command: "allocate".into(),
                subject: "出力".into(),
                figure: figure.into(),
            };
            append(&path, &entry)?;
        }
        let text = fs::read_to_string(&path)?;

        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "\u{feff}timestamp,command,subject,figure");
        assert!(lines[2].ends_with(",allocate,出力,-12 MWh"));
        assert_eq!(text.matches('\u{feff}').count(), 1);
        Ok(())
    }
}
