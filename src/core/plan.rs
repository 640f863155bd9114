//! Annual generation trading plan.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    context::RunContext,
    core::{
        allocation::{AllocationResult, Allocator},
        series::HourlySeries,
        slot::Month,
    },
    prelude::*,
    quantity::{energy::MegawattHours, power::Megawatts, time::Hours},
};

/// How the monthly deduction is expressed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionMode {
    /// Deduct a fixed number of hours.
    #[default]
    Hours,

    /// Deduct a percentage of the gross hours.
    Percentage,
}

/// Monthly deduction of mechanism and guaranteed electricity, plus curtailment.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyParameter {
    #[serde(default)]
    pub mode: DeductionMode,

    #[serde(default)]
    pub value: f64,

    /// Fraction within `0..=1`.
    #[serde(default)]
    pub curtailment_rate: f64,
}

impl MonthlyParameter {
    pub fn validate(&self) -> Result {
        ensure!(self.value.is_finite() && self.value >= 0.0, "deduction must be non-negative");
        if self.mode == DeductionMode::Percentage {
            ensure!(self.value <= 100.0, "deduction percentage must not exceed 100");
        }
        ensure!(
            (0.0..=1.0).contains(&self.curtailment_rate),
            "curtailment rate must be within 0..=1, got {}",
            self.curtailment_rate,
        );
        Ok(())
    }

    pub fn deduction(&self, gross: Hours) -> Hours {
        match self.mode {
            DeductionMode::Hours => Hours(self.value),
            DeductionMode::Percentage => gross * (self.value / 100.0),
        }
    }

    pub fn net_hours(&self, gross: Hours) -> Hours {
        (gross - self.deduction(gross)).max(Hours::ZERO) * (1.0 - self.curtailment_rate)
    }
}

#[must_use]
#[derive(Debug, Deserialize)]
pub struct PlanConfig {
    #[serde(rename = "capacity_mw")]
    pub capacity: Megawatts,

    #[serde(default)]
    pub months: Vec<MonthEntry>,
}

#[must_use]
#[derive(Debug, Deserialize)]
pub struct MonthEntry {
    pub month: Month,

    #[serde(rename = "gross_hours")]
    pub gross: Hours,

    #[serde(flatten)]
    pub parameter: MonthlyParameter,
}

impl PlanConfig {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read the plan `{}`", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse the plan `{}`", path.display()))
    }
}

#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct MonthlyPlan {
    pub month: Month,
    pub parameter: MonthlyParameter,
    pub gross: Hours,
    pub deduction: Hours,
    pub net: Hours,
    pub energy: MegawattHours,
}

#[must_use]
#[derive(Clone, Debug)]
pub struct AnnualPlan {
    pub capacity: Megawatts,
    pub months: Vec<MonthlyPlan>,
}

impl AnnualPlan {
    /// Derive the tradable energy of every month, months missing in the config get the defaults.
    #[instrument(skip_all, fields(capacity = ?config.capacity))]
    pub fn try_build(config: &PlanConfig) -> Result<Self> {
        ensure!(config.capacity.is_positive(), "installed capacity must be positive");

        let mut entries = BTreeMap::new();
        for entry in &config.months {
            entry.parameter.validate().with_context(|| format!("invalid parameters for {}", entry.month))?;
            ensure!(entry.gross >= Hours::ZERO, "gross hours for {} must be non-negative", entry.month);
            ensure!(entries.insert(entry.month, entry).is_none(), "{} is listed twice", entry.month);
        }

        let months = Month::iter()
            .map(|month| {
                let (gross, parameter) = entries
                    .get(&month)
                    .map_or((Hours::ZERO, MonthlyParameter::default()), |entry| {
                        (entry.gross, entry.parameter)
                    });
                let deduction = parameter.deduction(gross);
                let net = parameter.net_hours(gross);
                MonthlyPlan { month, parameter, gross, deduction, net, energy: config.capacity * net }
            })
            .collect();
        Ok(Self { capacity: config.capacity, months })
    }

    pub fn total_energy(&self) -> MegawattHours {
        self.months.iter().map(|month| month.energy).sum()
    }

    /// Spread every month's energy over the slots of its typical daily profile.
    ///
    /// Months without a usable profile are reported and left out.
    #[instrument(skip_all)]
    pub fn allocate_hourly(
        &self,
        profiles: &BTreeMap<Month, HourlySeries>,
        context: &mut RunContext,
    ) -> BTreeMap<Month, AllocationResult> {
        let mut allocations = BTreeMap::new();
        for month in &self.months {
            let Some(profile) = profiles.get(&month.month) else {
                context.warn(month.month.sheet_name(), "no hourly profile, skipped");
                continue;
            };
            let result = Allocator::builder()
                .weights(profile)
                .total(month.energy.0)
                .precision(context.precision)
                .build()
                .allocate();
            match result {
                Ok(allocation) => {
                    allocations.insert(month.month, allocation);
                }
                Err(error) => context.warn(month.month.sheet_name(), error),
            }
        }
        allocations
    }
}
