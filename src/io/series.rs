//! Slot series loaded from tables keyed by a slot or timestamp column.

use std::iter;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::{
    context::RunContext,
    prelude::*,
    core::series::{AverageBySlot, HourlySeries},
    io::{
        Row,
        cell::Cell,
        schema::{Schema, SchemaError},
    },
};

/// 1-based slot number column.
pub const SLOT_COLUMN: &str = "时段";

/// Timestamp column of historical readings.
pub const TIME_COLUMN: &str = "时间";

const TIMESTAMP_FORMATS: [&str; 5] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Read the value columns of a slot-keyed table into one series per column.
///
/// Invalid slot numbers and duplicate slots skip the row, invalid values and
/// slots the table never mentions become zero. Each substitution is recorded
/// in the context.
pub fn read_series(
    rows: &[Row],
    columns: &[&str],
    scope: &str,
    context: &mut RunContext,
) -> Result<Vec<HourlySeries>, SchemaError> {
    let binding = Schema::new(iter::once(SLOT_COLUMN).chain(columns.iter().copied())).bind(rows)?;
    let granularity = context.granularity;
    let n_slots = granularity.n_slots();
    let mut values: Vec<Vec<Option<f64>>> = vec![vec![None; n_slots]; columns.len()];

    for (index, row) in rows.iter().enumerate().skip(binding.header_row + 1) {
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        let row_scope = format!("{scope}, row {}", index + 1);
        let slot_cell = binding.cell(row, 0);
        let Some(slot) = slot_cell.as_number().and_then(|slot| slot_index(slot, n_slots)) else {
            context.warn(row_scope, format!("invalid slot `{slot_cell}`"));
            continue;
        };
        if values.first().is_some_and(|column| column[slot].is_some()) {
            context.warn(row_scope, format!("duplicate slot {}", slot + 1));
            continue;
        }
        for (field, (column, target)) in columns.iter().zip(&mut values).enumerate() {
            let cell = binding.cell(row, field + 1);
            let value = cell.as_number().unwrap_or_else(|| {
                context.warn(&row_scope, format!("invalid `{column}` value `{cell}`, using zero"));
                0.0
            });
            target[slot] = Some(value);
        }
    }

    if let Some(first) = values.first() {
        let n_missing = first.iter().filter(|value| value.is_none()).count();
        if n_missing != 0 {
            context.warn(scope, format!("{n_missing} of {n_slots} slots missing, using zero"));
        }
    }

    Ok(values
        .into_iter()
        .map(|column| {
            HourlySeries::from_slots(
                granularity,
                column.into_iter().enumerate().filter_map(|(slot, value)| Some((slot, value?))),
            )
        })
        .collect())
}

/// Average a timestamped history column into a typical day.
pub fn read_history(
    rows: &[Row],
    column: &str,
    scope: &str,
    context: &mut RunContext,
) -> Result<HourlySeries, SchemaError> {
    let binding = Schema::new([TIME_COLUMN, column]).bind(rows)?;
    let mut readings = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(binding.header_row + 1) {
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        let time_cell = binding.cell(row, 0);
        let value_cell = binding.cell(row, 1);
        match (parse_timestamp(time_cell), value_cell.as_number()) {
            (Some(timestamp), Some(value)) => readings.push((timestamp, value)),
            (None, _) => context.warn(
                format!("{scope}, row {}", index + 1),
                format!("invalid timestamp `{time_cell}`"),
            ),
            (Some(_), None) => context.warn(
                format!("{scope}, row {}", index + 1),
                format!("invalid `{column}` value `{value_cell}`"),
            ),
        }
    }
    debug!(scope, n_readings = readings.len(), "averaging the history");
    Ok(readings.into_iter().average_by_slot(context.granularity))
}

/// 0-based index of a 1-based slot number.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn slot_index(slot: f64, n_slots: usize) -> Option<usize> {
    (slot.fract() == 0.0 && slot >= 1.0 && slot <= n_slots as f64).then(|| slot as usize - 1)
}

fn parse_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Number(serial) => from_excel_serial(*serial),
        Cell::Text(text) => TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text.trim(), format).ok()),
        Cell::Empty => None,
    }
}

/// Spreadsheet serial day number, counted from 1899-12-30.
fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    #[expect(clippy::cast_possible_truncation)]
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::Timelike;

    use super::*;
    use crate::core::slot::Granularity;

    fn table(rows: &[&[&str]]) -> Vec<Row> {
        rows.iter().map(|row| row.iter().map(|cell| Cell::from(*cell)).collect()).collect()
    }

    #[test]
    fn test_read_series() {
        let mut rows = table(&[&["时段", "实际出力", "持仓电量"]]);
        for slot in 1..=24 {
            rows.push(vec![Cell::from(f64::from(slot)), Cell::from(1.5), Cell::from("2")]);
        }
        let mut context = RunContext::builder().build();
        let series = read_series(&rows, &["实际出力", "持仓电量"], "sheet", &mut context).unwrap();
        assert_eq!(series.len(), 2);
        assert_abs_diff_eq!(series[0].total(), 36.0);
        assert_abs_diff_eq!(series[1].total(), 48.0);
        assert!(context.warnings().is_empty());
    }

    #[test]
    fn test_invalid_cells_become_zero_with_warnings() {
        let rows = table(&[
            &["时段", "电量"],
            &["1", "10"],
            &["2", "/"],
            &["x", "5"],
            &["1", "7"],
            &["25", "9"],
            &["", ""],
        ]);
        let mut context = RunContext::builder().build();
        let series = read_series(&rows, &["电量"], "sheet", &mut context).unwrap();
        assert_abs_diff_eq!(series[0][0], 10.0);
        assert_abs_diff_eq!(series[0][1], 0.0);
        assert_abs_diff_eq!(series[0].total(), 10.0);

        // invalid value, bad slot, duplicate, out of range, missing slots
        assert_eq!(context.warnings().len(), 5);
        assert_eq!(context.warnings()[0].scope, "sheet, row 3");
    }

    #[test]
    fn test_quarter_hourly() {
        let mut rows = table(&[&["时段", "电量"]]);
        rows.extend((1..=96).map(|slot| vec![Cell::from(f64::from(slot)), Cell::from(0.25)]));
        let mut context = RunContext::builder().granularity(Granularity::QuarterHourly).build();
        let series = read_series(&rows, &["电量"], "sheet", &mut context).unwrap();
        assert_eq!(series[0].n_slots(), 96);
        assert_abs_diff_eq!(series[0].total(), 24.0);
    }

    #[test]
    fn test_missing_column() {
        let rows = table(&[&["时段", "电量"]]);
        let mut context = RunContext::builder().build();
        let error = read_series(&rows, &["电量", "电价"], "sheet", &mut context).unwrap_err();
        assert_eq!(error, SchemaError::MissingFields { missing: vec!["电价".into()] });
    }

    #[test]
    fn test_read_history() {
        let rows = table(&[
            &["时间", "实际出力"],
            &["2024-03-01 10:15", "4"],
            &["2024-03-02 10:45:00", "6"],
            &["2024/03/02 23:00", "1"],
            &["yesterday", "1"],
        ]);
        let mut context = RunContext::builder().build();
        let series = read_history(&rows, "实际出力", "history", &mut context).unwrap();
        assert_abs_diff_eq!(series[10], 5.0);
        assert_abs_diff_eq!(series[23], 1.0);
        assert_abs_diff_eq!(series.total(), 6.0);
        assert_eq!(context.warnings().len(), 1);
    }

    #[test]
    fn test_excel_serial() {
        let timestamp = from_excel_serial(45_352.5).unwrap();
        assert_eq!(timestamp.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(timestamp.hour(), 12);
    }
}
