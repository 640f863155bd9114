use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::{
    cli::{Summary, input::OutputArgs},
    context::RunContext,
    core::{
        plan::{AnnualPlan, PlanConfig},
        series::HourlySeries,
        slot::Month,
    },
    io::{
        cell::Cell,
        export::{ExportCell, SeriesColumn, Sheet},
        series::read_series,
        workbook::Workbook,
    },
    prelude::*,
    tables::{build_allocation_table, build_plan_table},
};

#[derive(Parser)]
pub struct PlanArgs {
    /// TOML file with the capacity and the monthly parameters.
    #[clap(long = "config", env = "PLAN_PATH", default_value = "plan.toml")]
    config_path: PathBuf,

    /// Workbook with a typical daily profile on each of the `1月`..`12月` sheets.
    #[clap(long = "profiles", env = "PROFILES_PATH")]
    profiles_path: Option<PathBuf>,

    #[clap(long, env = "PROFILE_COLUMN", default_value = "平均出力")]
    profile_column: String,

    #[clap(flatten)]
    output: OutputArgs,
}

impl PlanArgs {
    #[instrument(skip_all)]
    pub fn run(self, context: &mut RunContext) -> Result<Option<Summary>> {
        let plan = AnnualPlan::try_build(&PlanConfig::read_from(&self.config_path)?)?;
        println!("{}", build_plan_table(&plan, context.precision.into()));
        let mut sheets = vec![plan_sheet(&plan)];

        if let Some(profiles_path) = &self.profiles_path {
            let profiles = self.read_profiles(profiles_path, context)?;
            for (month, allocation) in plan.allocate_hourly(&profiles, context) {
                println!("{month}");
                println!("{}", build_allocation_table(&allocation, context.precision.into()));
                sheets.push(Sheet::from_series(
                    month.sheet_name(),
                    &[SeriesColumn { name: "电量", series: &allocation.series, flag_negative: false }],
                ));
            }
        }

        self.output.save(&sheets)?;
        Ok(Some(Summary::new("年度计划", plan.total_energy())))
    }

    fn read_profiles(
        &self,
        path: &Path,
        context: &mut RunContext,
    ) -> Result<BTreeMap<Month, HourlySeries>> {
        let mut profiles = BTreeMap::new();
        for (month, rows) in Workbook::open(path)?.read_month_sheets(context)? {
            let scope = month.sheet_name();
            match read_series(&rows, &[self.profile_column.as_str()], &scope, context) {
                Ok(mut series) => {
                    profiles.insert(month, series.remove(0));
                }
                Err(error) => context.warn(scope, error),
            }
        }
        Ok(profiles)
    }
}

fn plan_sheet(plan: &AnnualPlan) -> Sheet {
    let mut sheet = Sheet::new("年度计划", ["月份", "毛小时数", "扣减小时数", "弃电率", "净小时数", "可交易电量"]);
    for month in &plan.months {
        sheet.push_row([
            ExportCell::plain(month.month.sheet_name()),
            ExportCell::plain(month.gross.0),
            ExportCell::plain(month.deduction.0),
            ExportCell::plain(month.parameter.curtailment_rate),
            ExportCell::plain(month.net.0),
            ExportCell::flag_if(month.energy.0, !month.energy.is_positive()),
        ]);
    }
    sheet.push_row([
        ExportCell::plain("合计"),
        ExportCell::plain(Cell::Empty),
        ExportCell::plain(Cell::Empty),
        ExportCell::plain(Cell::Empty),
        ExportCell::plain(Cell::Empty),
        ExportCell::plain(plan.total_energy().0),
    ]);
    sheet
}
