//! CSV tables, written with a UTF-8 byte order mark so spreadsheet software
//! picks the right encoding.

use std::io::{Read, Write};

use crate::{
    io::{Row, cell::Cell, export::Sheet},
    prelude::*,
};

const BOM: char = '\u{feff}';

pub fn read_rows(reader: impl Read) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(false).flexible(true).from_reader(reader);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to read a CSV record")?;
        rows.push(record.iter().map(|field| Cell::text(field.trim_start_matches(BOM))).collect());
    }
    Ok(rows)
}

pub fn write_sheet(mut writer: impl Write, sheet: &Sheet) -> Result {
    write!(writer, "{BOM}")?;
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&sheet.header)?;
    for row in &sheet.rows {
        writer.write_record(row.iter().map(|cell| cell.cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::RunContext,
        core::series::HourlySeries,
        io::{export::SeriesColumn, series::read_series},
    };

    #[test]
    fn test_bom_round_trip() -> Result {
        let values = (0..24).map(|slot| f64::from(slot) * 1.25 - 3.0).collect();
        let series = HourlySeries::try_new(values)?;
        let sheet = Sheet::from_series(
            "偏差",
            &[SeriesColumn { name: "偏差电量", series: &series, flag_negative: true }],
        );

        let mut buffer = Vec::new();
        write_sheet(&mut buffer, &sheet)?;
        assert!(buffer.starts_with("\u{feff}".as_bytes()));

        let rows = read_rows(buffer.as_slice())?;
        let mut context = RunContext::builder().build();
        let loaded = read_series(&rows, &["偏差电量"], "csv", &mut context)?;
        assert_eq!(loaded[0], series);
        assert!(context.warnings().is_empty());
        Ok(())
    }
}
