use clap::Parser;

use crate::{
    cli::{
        Summary,
        input::{InputArgs, OutputArgs},
    },
    context::RunContext,
    core::profit::ExcessProfit,
    io::export::{SeriesColumn, Sheet},
    prelude::*,
    tables::build_profit_table,
};

#[derive(Parser)]
pub struct ProfitArgs {
    #[clap(flatten)]
    input: InputArgs,

    #[clap(long, env = "POSITION_COLUMN", default_value = "合约电量")]
    position_column: String,

    #[clap(long, env = "SPOT_PRICE_COLUMN", default_value = "现货电价")]
    spot_column: String,

    #[clap(long, env = "CONTRACT_PRICE_COLUMN", default_value = "合约电价")]
    contract_column: String,

    #[clap(flatten)]
    output: OutputArgs,
}

impl ProfitArgs {
    #[instrument(skip_all)]
    pub fn run(self, context: &mut RunContext) -> Result<Option<Summary>> {
        let columns =
            [self.position_column.as_str(), self.spot_column.as_str(), self.contract_column.as_str()];
        let mut series = self.input.read_series(&columns, context)?;
        let contract = series.remove(2);
        let spot = series.remove(1);
        let profit = ExcessProfit::try_new(series.remove(0), &spot, &contract)?;
        println!("{}", build_profit_table(&profit, context.precision.into()));

        self.output.save(&[Sheet::from_series(
            "超额收益",
            &[
                SeriesColumn { name: &self.position_column, series: &profit.position, flag_negative: false },
                SeriesColumn { name: "价差", series: &profit.spread, flag_negative: false },
                SeriesColumn { name: "超额收益", series: &profit.profit, flag_negative: true },
            ],
        )])?;

        let summary = profit.summary();
        info!(
            gain = %summary.gain,
            loss = %summary.loss,
            net = %summary.net,
            n_losses = profit.losses().count(),
            "calculated",
        );
        Ok(Some(Summary::new("超额收益", summary.net)))
    }
}
