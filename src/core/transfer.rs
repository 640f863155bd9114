//! Solar arbitrage curve: move the morning and evening output into the core hours.

use crate::{
    core::{allocation::AllocationResult, series::HourlySeries, slot::HourRange},
    prelude::*,
};

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum TransferError {
    #[error("core hours {core} overlap the edge hours {edge}")]
    CoreOverlapsEdge { core: HourRange, edge: HourRange },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Role {
    Donor,
    Core,
    Keep,
}

#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct TransferWindows {
    morning: HourRange,
    evening: HourRange,
    core: HourRange,
}

impl TransferWindows {
    /// Morning and evening edges are swapped when given in the reverse order.
    pub fn try_new(
        morning: HourRange,
        evening: HourRange,
        core: HourRange,
    ) -> Result<Self, TransferError> {
        let (morning, evening) =
            if morning.start() <= evening.start() { (morning, evening) } else { (evening, morning) };
        for edge in [morning, evening] {
            if core.overlaps(edge) {
                return Err(TransferError::CoreOverlapsEdge { core, edge });
            }
        }
        Ok(Self { morning, evening, core })
    }

    /// Hours outside the envelope are emptied into the core as well.
    pub fn envelope(&self) -> HourRange {
        HourRange::new(self.morning.start().into(), self.evening.end().into())
    }

    fn role(&self, hour: u8) -> Role {
        if self.core.contains(hour) {
            Role::Core
        } else if self.morning.contains(hour)
            || self.evening.contains(hour)
            || !self.envelope().contains(hour)
        {
            Role::Donor
        } else {
            Role::Keep
        }
    }

    /// Empty every donor slot and split the donated quantity equally over the core slots.
    #[instrument(skip_all, fields(morning = %self.morning, evening = %self.evening, core = %self.core))]
    pub fn apply_series(&self, series: &HourlySeries) -> HourlySeries {
        let granularity = series.granularity();
        let roles = (0..series.n_slots())
            .map(|slot| self.role(granularity.hour_of(slot)))
            .collect::<Vec<_>>();
        let donated: f64 = series
            .iter()
            .zip(&roles)
            .filter(|(_, role)| **role == Role::Donor)
            .map(|(value, _)| value)
            .sum();
        let n_core_slots = roles.iter().filter(|role| **role == Role::Core).count();

        #[expect(clippy::cast_precision_loss)]
        let bonus = donated / n_core_slots as f64;
        info!(donated, n_core_slots, bonus, "transferring");

        HourlySeries::from_slots(
            granularity,
            series.iter().zip(roles).enumerate().map(|(slot, (value, role))| {
                let value = match role {
                    Role::Donor => 0.0,
                    Role::Core => value + bonus,
                    Role::Keep => value,
                };
                (slot, value)
            }),
        )
    }

    pub fn apply(&self, allocation: &AllocationResult) -> AllocationResult {
        AllocationResult::new(allocation.total, self.apply_series(&allocation.series))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::slot::Granularity;

    fn windows(morning: &str, evening: &str, core: &str) -> TransferWindows {
        TransferWindows::try_new(
            morning.parse().unwrap(),
            evening.parse().unwrap(),
            core.parse().unwrap(),
        )
        .unwrap()
    }

    /// Value by 1-based hour.
    fn hourly(values: &[(usize, f64)]) -> HourlySeries {
        HourlySeries::from_slots(
            Granularity::Hourly,
            values.iter().map(|(hour, value)| (hour - 1, *value)),
        )
    }

    #[test]
    fn test_edges_into_core() {
        let input = hourly(&[
            (1, 50.0),
            (2, 50.0),
            (3, 50.0),
            (4, 50.0),
            (8, 20.0),
            (12, 30.0),
            (19, 50.0),
            (20, 50.0),
            (21, 50.0),
            (22, 50.0),
        ]);
        let output = windows("1-5", "19-24", "11-14").apply_series(&input);
        assert_abs_diff_eq!(output[10], 100.0);
        assert_abs_diff_eq!(output[11], 130.0);
        assert_abs_diff_eq!(output[12], 100.0);
        assert_abs_diff_eq!(output[13], 100.0);
        for hour in (1..=5).chain(19..=24) {
            assert_abs_diff_eq!(output[hour - 1], 0.0);
        }
        assert_abs_diff_eq!(output[7], 20.0);
        assert_abs_diff_eq!(output.total(), input.total(), epsilon = 1e-9);
    }

    #[test]
    fn test_outside_envelope_is_emptied() {
        let input = HourlySeries::try_new(vec![1.0; 24]).unwrap();
        let output = windows("6-7", "17-18", "11-14").apply_series(&input);
        // Hours 1-7 and 17-24 are donors: 15 hours over 4 core hours.
        assert_abs_diff_eq!(output[0], 0.0);
        assert_abs_diff_eq!(output[9], 1.0);
        assert_abs_diff_eq!(output[10], 1.0 + 15.0 / 4.0);
        assert_abs_diff_eq!(output.total(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_inverted_ranges_conserve_total() {
        let input = HourlySeries::try_new((0..24).map(|hour| f64::from(hour) * 0.7).collect()).unwrap();
        let output = windows("24-19", "5-1", "14-11").apply_series(&input);
        assert_abs_diff_eq!(output[0], 0.0);
        assert_abs_diff_eq!(output[23], 0.0);
        assert_abs_diff_eq!(output.total(), input.total(), epsilon = 1e-9);
    }

    #[test]
    fn test_quarter_hourly() {
        let input = HourlySeries::try_new(vec![1.0; 96]).unwrap();
        let output = windows("1-5", "19-24", "11-14").apply_series(&input);
        // 11 edge hours × 4 slots donate into 16 core slots.
        assert_abs_diff_eq!(output[40], 1.0 + 44.0 / 16.0);
        assert_abs_diff_eq!(output.total(), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_allocation_total_is_kept() {
        let input = AllocationResult::from_series(HourlySeries::try_new(vec![2.0; 24]).unwrap());
        let output = windows("1-5", "19-24", "11-14").apply(&input);
        assert_abs_diff_eq!(output.total, 48.0);
        assert_abs_diff_eq!(output.shares.iter().sum::<f64>(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_core_overlapping_edge() {
        let result = TransferWindows::try_new(
            HourRange::new(1, 5),
            HourRange::new(19, 24),
            HourRange::new(4, 12),
        );
        assert_eq!(
            result.unwrap_err(),
            TransferError::CoreOverlapsEdge {
                core: HourRange::new(4, 12),
                edge: HourRange::new(1, 5)
            },
        );
    }
}
