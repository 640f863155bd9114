use clap::Parser;

use crate::{
    cli::{
        Summary,
        input::{InputArgs, OutputArgs},
    },
    context::RunContext,
    core::{
        allocation::{AllocationError, AllocationResult, Allocator, Pin},
        series::HourlySeries,
    },
    io::export::{SeriesColumn, Sheet},
    prelude::*,
    quantity::energy::MegawattHours,
    tables::build_allocation_table,
};

#[derive(Parser)]
pub struct AllocateArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// Column with the weights, typically the average output curve.
    #[clap(long, env = "WEIGHT_COLUMN", default_value = "平均出力")]
    weight_column: String,

    /// Average a timestamped history (`时间` column) into the weights instead.
    #[clap(long)]
    history: bool,

    /// Total to spread over the slots.
    #[clap(long, env = "ALLOCATION_TOTAL", allow_negative_numbers = true)]
    total: f64,

    /// Slot fixed to a value, 1-based, repeatable.
    #[clap(long = "pin", value_name = "SLOT=VALUE")]
    pins: Vec<Pin>,

    #[clap(flatten)]
    output: OutputArgs,
}

impl AllocateArgs {
    #[instrument(skip_all, fields(total = self.total))]
    pub fn run(self, context: &mut RunContext) -> Result<Option<Summary>> {
        let weights = if self.history {
            self.input.read_history(&self.weight_column, context)?
        } else {
            self.input.read_series(&[self.weight_column.as_str()], context)?.remove(0)
        };
        let Some(allocation) = allocate(&weights, self.total, &self.pins, &self.weight_column, context)?
        else {
            return Ok(None);
        };
        println!("{}", build_allocation_table(&allocation, context.precision.into()));
        self.output.save(&[Sheet::from_series(
            "分配结果",
            &[SeriesColumn { name: &self.weight_column, series: &allocation.series, flag_negative: false }],
        )])?;
        Ok(Some(Summary::new(self.weight_column, MegawattHours(allocation.series.total()))))
    }
}

/// Allocate the total, reporting all-zero weights as a warning rather than failing.
pub fn allocate(
    weights: &HourlySeries,
    total: f64,
    pins: &[Pin],
    scope: &str,
    context: &mut RunContext,
) -> Result<Option<AllocationResult>> {
    let result = Allocator::builder()
        .weights(weights)
        .total(total)
        .precision(context.precision)
        .pinned(pins.iter().map(|pin| (pin.slot, pin.value)).collect())
        .build()
        .allocate();
    match result {
        Ok(allocation) => Ok(Some(allocation)),
        Err(AllocationError::ZeroWeight) => {
            context.warn(scope, AllocationError::ZeroWeight);
            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::slot::Granularity;

    #[test]
    fn test_zero_weights_are_reported() -> Result {
        let mut context = RunContext::builder().build();
        let allocation = allocate(&HourlySeries::zeros(Granularity::Hourly), 100.0, &[], "出力", &mut context)?;
        assert!(allocation.is_none());
        assert_eq!(context.warnings().len(), 1);
        Ok(())
    }

    #[test]
    fn test_pins() -> Result {
        let mut context = RunContext::builder().build();
        let weights = HourlySeries::try_new(vec![1.0; 24])?;
        let pins = ["1=50".parse::<Pin>()?];
        let allocation = allocate(&weights, 280.0, &pins, "出力", &mut context)?.unwrap();
        assert_abs_diff_eq!(allocation.series[0], 50.0);
        assert_abs_diff_eq!(allocation.series[1], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(allocation.series.total(), 280.0, epsilon = 0.01);
        Ok(())
    }

    #[test]
    fn test_pin_out_of_range_fails() {
        let mut context = RunContext::builder().build();
        let weights = HourlySeries::zeros(Granularity::Hourly);
        let pins = [Pin { slot: 25, value: 1.0 }];
        assert!(allocate(&weights, 1.0, &pins, "出力", &mut context).is_err());
    }
}
