use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    context::Warning,
    core::{
        allocation::AllocationResult,
        plan::AnnualPlan,
        profit::ExcessProfit,
        reconcile::Reconciliation,
        slot::Granularity,
    },
    extract::Bill,
    store::stations::StationBook,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn slot_cell(granularity: Granularity, slot: usize) -> Cell {
    match granularity {
        Granularity::Hourly => Cell::new(slot + 1),
        Granularity::QuarterHourly => Cell::new(format!("{} ({}h)", slot + 1, granularity.hour_of(slot))),
    }
}

fn number_cell(value: f64, precision: usize) -> Cell {
    Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right)
}

fn signed_cell(value: f64, precision: usize) -> Cell {
    number_cell(value, precision).fg(if value < 0.0 { Color::Red } else { Color::Green })
}

pub fn build_allocation_table(allocation: &AllocationResult, precision: usize) -> Table {
    let granularity = allocation.series.granularity();
    let mut table = new_table();
    table.set_header(vec!["Slot", "Value", "Share"]);
    for (slot, (value, share)) in allocation.series.iter().zip(&allocation.shares).enumerate() {
        table.add_row(vec![
            slot_cell(granularity, slot).add_attribute(Attribute::Dim),
            number_cell(value, precision),
            Cell::new(format!("{share:.2}%")).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        number_cell(allocation.series.total(), precision).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table
}

pub fn build_transfer_table(before: &AllocationResult, after: &AllocationResult, precision: usize) -> Table {
    let granularity = before.series.granularity();
    let mut table = new_table();
    table.set_header(vec!["Slot", "Before", "After", "Change"]);
    for (slot, (before, after)) in before.series.iter().zip(after.series.iter()).enumerate() {
        let change = after - before;
        table.add_row(vec![
            slot_cell(granularity, slot).add_attribute(Attribute::Dim),
            number_cell(before, precision).add_attribute(Attribute::Dim),
            number_cell(after, precision),
            if change.abs() < f64::EPSILON { Cell::new("") } else { signed_cell(change, precision) },
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        number_cell(before.series.total(), precision),
        number_cell(after.series.total(), precision).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table
}

/// Deviation per slot, shortfalls in red.
pub fn build_deviation_table(
    reconciliation: &Reconciliation,
    observed_label: &str,
    held_label: &str,
    precision: usize,
) -> Table {
    let granularity = reconciliation.deviation.granularity();
    let mut table = new_table();
    table.set_header(vec!["Slot", observed_label, held_label, "Deviation"]);
    let rows = reconciliation
        .observed
        .iter()
        .zip(reconciliation.held.iter())
        .zip(reconciliation.deviation.iter())
        .enumerate();
    for (slot, ((observed, held), deviation)) in rows {
        table.add_row(vec![
            slot_cell(granularity, slot).add_attribute(Attribute::Dim),
            number_cell(observed, precision),
            number_cell(held, precision).add_attribute(Attribute::Dim),
            signed_cell(deviation, precision),
        ]);
    }
    table.add_row(vec![
        Cell::new("Shortfall").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        signed_cell(reconciliation.total_shortfall(), precision),
    ]);
    table.add_row(vec![
        Cell::new("Surplus").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        signed_cell(reconciliation.total_surplus(), precision),
    ]);
    table
}

pub fn build_plan_table(plan: &AnnualPlan, precision: usize) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Month", "Mode", "Gross", "Deduction", "Curtailment", "Net", "Energy"]);
    for month in &plan.months {
        table.add_row(vec![
            Cell::new(month.month.sheet_name()),
            Cell::new(format!("{:?}", month.parameter.mode)).add_attribute(Attribute::Dim),
            number_cell(month.gross.0, precision),
            number_cell(month.deduction.0, precision).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.1}%", month.parameter.curtailment_rate * 100.0))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            number_cell(month.net.0, precision),
            number_cell(month.energy.0, precision).fg(if month.energy.is_positive() {
                Color::Green
            } else {
                Color::DarkYellow
            }),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}", plan.capacity)).add_attribute(Attribute::Dim),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        number_cell(plan.total_energy().0, precision).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn build_profit_table(profit: &ExcessProfit, precision: usize) -> Table {
    let granularity = profit.position.granularity();
    let mut table = new_table();
    table.set_header(vec!["Slot", "Position", "Spread", "Profit"]);
    let rows = profit.position.iter().zip(profit.spread.iter()).zip(profit.profit.iter()).enumerate();
    for (slot, ((position, spread), gain)) in rows {
        table.add_row(vec![
            slot_cell(granularity, slot).add_attribute(Attribute::Dim),
            number_cell(position, precision),
            number_cell(spread, 2).add_attribute(Attribute::Dim),
            signed_cell(gain, 2),
        ]);
    }
    let summary = profit.summary();
    for (label, value) in [("Gain", summary.gain), ("Loss", summary.loss), ("Net", summary.net)] {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            signed_cell(value.0, 2),
        ]);
    }
    table
}

/// One row per bill and canonical subject, unmatched subjects dimmed.
pub fn build_settlement_table(bills: &[Bill], field_names: &[&str]) -> Table {
    let mut table = new_table();
    let mut header = vec!["Bill", "Subject"];
    header.extend_from_slice(field_names);
    table.set_header(header);
    for bill in bills {
        for line in &bill.lines {
            let mut row = vec![
                Cell::new(&bill.source).add_attribute(Attribute::Dim),
                if line.is_matched() {
                    Cell::new(&line.subject)
                } else {
                    Cell::new(&line.subject).fg(Color::DarkYellow).add_attribute(Attribute::Dim)
                },
            ];
            row.extend(line.values.iter().map(|value| match value {
                Some(value) => number_cell(*value, 2),
                None => Cell::new("—").add_attribute(Attribute::Dim),
            }));
            table.add_row(row);
        }
    }
    table
}

pub fn build_stations_table(book: &StationBook) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Station", "Online", "Priority", "Curtailment", "Mechanism", "Coefficient"]);
    for station in book.iter() {
        let mut row = vec![Cell::new(&station.name)];
        row.extend(
            station.ratios().into_iter().map(|ratio| number_cell(ratio, 4).add_attribute(Attribute::Dim)),
        );
        row.push(number_cell(station.value(), 4).add_attribute(Attribute::Bold));
        table.add_row(row);
    }
    table
}

pub fn build_warnings_table(warnings: &[Warning]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Scope", "Warning"]);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(&warning.scope).add_attribute(Attribute::Dim),
            Cell::new(&warning.message).fg(Color::DarkYellow),
        ]);
    }
    table
}
