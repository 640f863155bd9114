use clap::Parser;

use crate::{
    cli::{
        Summary,
        input::{InputArgs, OutputArgs},
    },
    context::RunContext,
    core::{allocation::AllocationResult, slot::HourRange, transfer::TransferWindows},
    io::export::{SeriesColumn, Sheet},
    prelude::*,
    quantity::energy::MegawattHours,
    tables::build_transfer_table,
};

#[derive(Parser)]
pub struct ArbitrageArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// Column with the allocated values.
    #[clap(long, env = "VALUE_COLUMN", default_value = "电量")]
    value_column: String,

    /// Morning edge hours, emptied into the core.
    #[clap(long, env = "MORNING_HOURS", default_value = "1-5")]
    morning: HourRange,

    /// Evening edge hours, emptied into the core.
    #[clap(long, env = "EVENING_HOURS", default_value = "19-24")]
    evening: HourRange,

    /// Core hours receiving the transferred amount.
    #[clap(long, env = "CORE_HOURS", default_value = "11-14")]
    core: HourRange,

    #[clap(flatten)]
    output: OutputArgs,
}

impl ArbitrageArgs {
    #[instrument(skip_all)]
    pub fn run(self, context: &mut RunContext) -> Result<Option<Summary>> {
        let windows = TransferWindows::try_new(self.morning, self.evening, self.core)?;
        let series = self.input.read_series(&[self.value_column.as_str()], context)?.remove(0);
        let before = AllocationResult::from_series(series);
        let after = windows.apply(&before);
        println!("{}", build_transfer_table(&before, &after, context.precision.into()));

        self.output.save(&[Sheet::from_series(
            "套利曲线",
            &[
                SeriesColumn { name: "调整前", series: &before.series, flag_negative: false },
                SeriesColumn { name: "调整后", series: &after.series, flag_negative: true },
            ],
        )])?;
        let moved: f64 = before
            .series
            .iter()
            .zip(after.series.iter())
            .map(|(before, after)| (after - before).max(0.0))
            .sum();
        info!(moved, "transferred into the core hours");
        Ok(Some(Summary::new(self.value_column, MegawattHours(moved))))
    }
}
