//! Proportional allocation of a fixed total over the slots of a day.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use crate::{
    core::series::{HourlySeries, round_to},
    prelude::*,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AllocationError {
    #[error("the weights of the free slots sum up to zero")]
    ZeroWeight,

    #[error("slot {slot} is out of range 1..={n_slots}")]
    SlotOutOfRange { slot: usize, n_slots: usize },

    #[error("the total must be finite, got {0}")]
    NonFiniteTotal(f64),

    #[error("the pinned value of slot {slot} must be finite")]
    NonFinitePin { slot: usize },
}

/// Slot series derived from a total, with the percentage breakdown.
#[must_use]
#[derive(Clone, Debug)]
pub struct AllocationResult {
    pub total: f64,
    pub series: HourlySeries,

    /// Percentage of the total per slot.
    pub shares: Vec<f64>,
}

impl AllocationResult {
    pub fn new(total: f64, series: HourlySeries) -> Self {
        let shares = series
            .iter()
            .map(|value| if total.abs() < f64::EPSILON { 0.0 } else { value / total * 100.0 })
            .collect();
        Self { total, series, shares }
    }

    /// Wrap a plain series, taking its sum as the total.
    pub fn from_series(series: HourlySeries) -> Self {
        Self::new(series.total(), series)
    }
}

/// Slot pinned to a fixed value, written as `SLOT=VALUE` with a 1-based slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pin {
    pub slot: usize,
    pub value: f64,
}

impl FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (slot, value) = s.split_once('=').context("expected `SLOT=VALUE`")?;
        let value: f64 = value.trim().parse().with_context(|| format!("invalid value in `{s}`"))?;
        ensure!(value.is_finite(), "the pinned value in `{s}` must be finite");
        Ok(Self { slot: slot.trim().parse().with_context(|| format!("invalid slot in `{s}`"))?, value })
    }
}

#[must_use]
#[derive(bon::Builder)]
pub struct Allocator<'a> {
    weights: &'a HourlySeries,

    total: f64,

    /// Decimal places of the allocated values.
    #[builder(default = 2)]
    precision: u8,

    /// Fixed values by 1-based slot.
    #[builder(default)]
    pinned: BTreeMap<usize, f64>,
}

impl Allocator<'_> {
    /// Distribute the total proportionally to the weights.
    ///
    /// Pinned slots keep their values and the remainder goes to the free slots.
    /// The rounding residue lands on the last free slot, or on the last pinned
    /// slot when every slot is pinned. That slot is rounded as well, so the sum
    /// matches the total exactly only when the total itself fits the precision.
    #[instrument(skip_all, fields(total = self.total, n_pinned = self.pinned.len()))]
    pub fn allocate(&self) -> Result<AllocationResult, AllocationError> {
        if !self.total.is_finite() {
            return Err(AllocationError::NonFiniteTotal(self.total));
        }
        let n_slots = self.weights.n_slots();
        if let Some(&slot) = self.pinned.keys().find(|slot| **slot == 0 || **slot > n_slots) {
            return Err(AllocationError::SlotOutOfRange { slot, n_slots });
        }
        if let Some((&slot, _)) = self.pinned.iter().find(|(_, value)| !value.is_finite()) {
            return Err(AllocationError::NonFinitePin { slot });
        }

        let mut values = vec![0.0; n_slots];
        for (slot, value) in &self.pinned {
            values[slot - 1] = round_to(*value, self.precision);
        }
        let free_slots =
            (0..n_slots).filter(|index| !self.pinned.contains_key(&(index + 1))).collect::<Vec<_>>();

        let residue_slot = if let Some(&last_free_slot) = free_slots.last() {
            let weight = |index: usize| self.weights[index].max(0.0);
            let total_weight: f64 = free_slots.iter().map(|index| weight(*index)).sum();
            if total_weight <= 0.0 {
                return Err(AllocationError::ZeroWeight);
            }
            let remaining = self.total - self.pinned.values().sum::<f64>();
            for &index in &free_slots {
                values[index] = round_to(remaining * weight(index) / total_weight, self.precision);
            }
            last_free_slot
        } else {
            // Every slot is pinned, so there is at least one.
            n_slots - 1
        };

        let residue = self.total - values.iter().sum::<f64>();
        values[residue_slot] = round_to(values[residue_slot] + residue, self.precision);
        debug!(residue, residue_slot = residue_slot + 1, "corrected the rounding residue");

        let series = HourlySeries::from_slots(self.weights.granularity(), values.into_iter().enumerate());
        Ok(AllocationResult::new(self.total, series))
    }
}

impl Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.slot, self.value)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::slot::Granularity;

    fn series(values: impl IntoIterator<Item = f64>) -> HourlySeries {
        HourlySeries::try_new(values.into_iter().collect()).unwrap()
    }

    #[test]
    fn test_equal_weights() {
        let weights = series([1.0; 24]);
        let result = Allocator::builder().weights(&weights).total(2400.0).build().allocate().unwrap();
        for value in &result.series {
            assert_abs_diff_eq!(value, 100.0);
        }
        assert_abs_diff_eq!(result.series.total(), 2400.0);
        assert_abs_diff_eq!(result.shares[0], 100.0 / 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sum_is_preserved() {
        let weights = series((0..24).map(|hour| f64::from(hour % 7) * 1.37 + 0.01));
        for total in [1.0, 99.99, 1234.567, 100_000.0] {
            for precision in [0, 2, 3] {
                let total = round_to(total, precision);
                let result = Allocator::builder()
                    .weights(&weights)
                    .total(total)
                    .precision(precision)
                    .build()
                    .allocate()
                    .unwrap();
                assert_abs_diff_eq!(result.series.total(), total, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_residue_slot_is_rounded() {
        let weights = series([1.0; 24]);
        let result = Allocator::builder().weights(&weights).total(100.0).build().allocate().unwrap();
        // 100 / 24 = 4.17 each, the last slot takes 100 − 23 × 4.17.
        assert_abs_diff_eq!(result.series[0], 4.17);
        assert_abs_diff_eq!(result.series[23], 4.09);
        for value in &result.series {
            assert_abs_diff_eq!(value, round_to(value, 2));
        }
    }

    #[test]
    fn test_quarter_hourly() {
        let weights = series((0..96).map(f64::from));
        let result = Allocator::builder().weights(&weights).total(1000.0).build().allocate().unwrap();
        assert_eq!(result.series.granularity(), Granularity::QuarterHourly);
        assert_abs_diff_eq!(result.series[0], 0.0);
        assert_abs_diff_eq!(result.series.total(), 1000.0, epsilon = 0.01);
    }

    #[test]
    fn test_zero_weights() {
        let weights = HourlySeries::zeros(Granularity::Hourly);
        let result = Allocator::builder().weights(&weights).total(10.0).build().allocate();
        assert_eq!(result.unwrap_err(), AllocationError::ZeroWeight);
    }

    #[test]
    fn test_negative_weights_count_as_zero() {
        let mut values = vec![0.0; 24];
        values[0] = -5.0;
        values[1] = 1.0;
        let weights = series(values);
        let result = Allocator::builder().weights(&weights).total(10.0).build().allocate().unwrap();
        assert_abs_diff_eq!(result.series[0], 0.0);
        assert_abs_diff_eq!(result.series[1], 10.0);
    }

    #[test]
    fn test_pinned_slots() {
        let weights = series([1.0; 24]);
        let pinned = BTreeMap::from([(1, 50.0), (24, 0.0)]);
        let result = Allocator::builder()
            .weights(&weights)
            .total(100.0)
            .pinned(pinned)
            .build()
            .allocate()
            .unwrap();
        assert_abs_diff_eq!(result.series[0], 50.0);
        assert_abs_diff_eq!(result.series[23], 0.0);
        // 50 / 22 = 2.27 each, the residue goes to the last free slot (23).
        assert_abs_diff_eq!(result.series[1], 2.27);
        assert_abs_diff_eq!(result.series[22], 50.0 - 2.27 * 21.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.series.total(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_all_pinned_residue_goes_to_last_pinned() {
        let weights = HourlySeries::zeros(Granularity::Hourly);
        let pinned = (1..=24).map(|slot| (slot, 1.0)).collect::<BTreeMap<_, _>>();
        let result = Allocator::builder()
            .weights(&weights)
            .total(30.0)
            .pinned(pinned)
            .build()
            .allocate()
            .unwrap();
        assert_abs_diff_eq!(result.series[22], 1.0);
        assert_abs_diff_eq!(result.series[23], 7.0);
    }

    #[test]
    fn test_pinned_slot_out_of_range() {
        let weights = series([1.0; 24]);
        let result = Allocator::builder()
            .weights(&weights)
            .total(1.0)
            .pinned(BTreeMap::from([(25, 1.0)]))
            .build()
            .allocate();
        assert_eq!(result.unwrap_err(), AllocationError::SlotOutOfRange { slot: 25, n_slots: 24 });
    }

    #[test]
    fn test_non_finite_pins() {
        let weights = series([1.0; 24]);
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = Allocator::builder()
                .weights(&weights)
                .total(100.0)
                .pinned(BTreeMap::from([(1, 10.0), (3, value)]))
                .build()
                .allocate();
            assert_eq!(result.unwrap_err(), AllocationError::NonFinitePin { slot: 3 });
        }
    }

    #[test]
    fn test_parse_pin() -> Result {
        assert_eq!("3=12.5".parse::<Pin>()?, Pin { slot: 3, value: 12.5 });
        assert!("3:12.5".parse::<Pin>().is_err());
        assert!("3=NaN".parse::<Pin>().is_err());
        assert!("3=inf".parse::<Pin>().is_err());
        Ok(())
    }
}
