use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::{
        Summary,
        input::{InputArgs, OutputArgs},
        reconcile::deviation_sheet,
    },
    context::RunContext,
    prelude::*,
    quantity::energy::MegawattHours,
    store::stations::StationBook,
    tables::build_deviation_table,
};

#[derive(Parser)]
pub struct CorrectArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// Station whose coefficient corrects the forecast.
    #[clap(long, env = "STATION")]
    station: String,

    #[clap(long = "stations", env = "STATIONS_PATH", default_value = "stations.json")]
    stations_path: PathBuf,

    #[clap(long, env = "FORECAST_COLUMN", default_value = "预测出力")]
    forecast_column: String,

    #[clap(long, env = "CONTRACTED_COLUMN", default_value = "合约电量")]
    contracted_column: String,

    #[clap(flatten)]
    output: OutputArgs,
}

impl CorrectArgs {
    #[instrument(skip_all, fields(station = %self.station))]
    pub fn run(self, context: &mut RunContext) -> Result<Option<Summary>> {
        let book = StationBook::read_from(&self.stations_path)?;
        let station = book.get(&self.station).with_context(|| {
            format!("station `{}` is not in `{}`", self.station, self.stations_path.display())
        })?;
        info!(coefficient = station.value(), "correcting");

        let columns = [self.forecast_column.as_str(), self.contracted_column.as_str()];
        let mut series = self.input.read_series(&columns, context)?;
        let contracted = series.remove(1);
        let reconciliation = station.correct(&series[0], contracted)?;

        println!(
            "{}",
            build_deviation_table(
                &reconciliation,
                "修正出力",
                &self.contracted_column,
                context.precision.into(),
            ),
        );
        let sheet = deviation_sheet("修正偏差", "修正出力", &self.contracted_column, &reconciliation);
        self.output.save(&[sheet])?;
        Ok(Some(Summary::new(self.station, MegawattHours(reconciliation.total_shortfall()))))
    }
}
