use clap::Parser;

use crate::{
    cli::{
        Summary,
        input::{InputArgs, OutputArgs},
    },
    context::RunContext,
    core::reconcile::{Reconciliation, ShortfallPolicy},
    io::export::{SeriesColumn, Sheet},
    prelude::*,
    quantity::energy::MegawattHours,
    tables::build_deviation_table,
};

#[derive(Parser)]
pub struct ReconcileArgs {
    #[clap(flatten)]
    input: InputArgs,

    #[clap(long, env = "OBSERVED_COLUMN", default_value = "实际出力")]
    observed_column: String,

    #[clap(long, env = "HELD_COLUMN", default_value = "持仓电量")]
    held_column: String,

    /// Never report a shortfall larger than the held amount.
    #[clap(long)]
    clamp: bool,

    #[clap(flatten)]
    output: OutputArgs,
}

impl ReconcileArgs {
    #[instrument(skip_all, fields(clamp = self.clamp))]
    pub fn run(self, context: &mut RunContext) -> Result<Option<Summary>> {
        let columns = [self.observed_column.as_str(), self.held_column.as_str()];
        let mut series = self.input.read_series(&columns, context)?;
        let held = series.remove(1);
        let observed = series.remove(0);
        let policy = if self.clamp { ShortfallPolicy::ClampToPosition } else { ShortfallPolicy::Unclamped };
        let reconciliation = Reconciliation::try_new(observed, held, policy)?;

        println!(
            "{}",
            build_deviation_table(
                &reconciliation,
                &self.observed_column,
                &self.held_column,
                context.precision.into(),
            ),
        );
        let sheet = deviation_sheet("偏差", &self.observed_column, &self.held_column, &reconciliation);
        self.output.save(&[sheet])?;

        let shortfall = reconciliation.total_shortfall();
        info!(shortfall, n_shortfalls = reconciliation.shortfalls().count(), "reconciled");
        Ok(Some(Summary::new("偏差电量", MegawattHours(shortfall))))
    }
}

/// Observed, held and deviation columns, shortfalls flagged.
pub fn deviation_sheet(
    name: &str,
    observed_label: &str,
    held_label: &str,
    reconciliation: &Reconciliation,
) -> Sheet {
    Sheet::from_series(
        name,
        &[
            SeriesColumn { name: observed_label, series: &reconciliation.observed, flag_negative: false },
            SeriesColumn { name: held_label, series: &reconciliation.held, flag_negative: false },
            SeriesColumn { name: "偏差电量", series: &reconciliation.deviation, flag_negative: true },
        ],
    )
}
