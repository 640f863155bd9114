use crate::core::series::{HourlySeries, SeriesError};

/// How a shortfall larger than the held position is reported.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ShortfallPolicy {
    /// Report the plain difference.
    #[default]
    Unclamped,

    /// Never report a shortfall below the negated held amount.
    ClampToPosition,
}

/// Slot-wise `observed − held`.
pub fn diff(
    observed: &HourlySeries,
    held: &HourlySeries,
    policy: ShortfallPolicy,
) -> Result<HourlySeries, SeriesError> {
    observed.zip_with(held, |observed, held| {
        let deviation = observed - held;
        match policy {
            ShortfallPolicy::Unclamped => deviation,
            ShortfallPolicy::ClampToPosition => deviation.max(-held),
        }
    })
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Reconciliation {
    pub observed: HourlySeries,
    pub held: HourlySeries,
    pub deviation: HourlySeries,
}

impl Reconciliation {
    pub fn try_new(
        observed: HourlySeries,
        held: HourlySeries,
        policy: ShortfallPolicy,
    ) -> Result<Self, SeriesError> {
        let deviation = diff(&observed, &held, policy)?;
        Ok(Self { observed, held, deviation })
    }

    /// 0-based slots with a negative deviation.
    pub fn shortfalls(&self) -> impl Iterator<Item = usize> + '_ {
        self.deviation.iter().enumerate().filter(|(_, value)| *value < 0.0).map(|(slot, _)| slot)
    }

    #[must_use]
    pub fn total_shortfall(&self) -> f64 {
        self.deviation.iter().filter(|value| *value < 0.0).sum()
    }

    #[must_use]
    pub fn total_surplus(&self) -> f64 {
        self.deviation.iter().filter(|value| *value > 0.0).sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;

    fn series(values: impl IntoIterator<Item = f64>) -> HourlySeries {
        HourlySeries::try_new(values.into_iter().collect()).unwrap()
    }

    #[test]
    fn test_diff_is_elementwise() {
        let observed = series((0..24).map(|hour| f64::from(hour) * 1.5));
        let held = series((0..24).map(|hour| 20.0 - f64::from(hour)));
        let deviation = diff(&observed, &held, ShortfallPolicy::Unclamped).unwrap();
        for slot in 0..24 {
            assert_abs_diff_eq!(deviation[slot], observed[slot] - held[slot]);
        }
    }

    #[test]
    fn test_clamp_never_below_negated_position() {
        let observed = series((0..24).map(|hour| f64::from(hour) - 12.0));
        let held = series((0..24).map(|hour| f64::from(hour % 5)));
        let deviation = diff(&observed, &held, ShortfallPolicy::ClampToPosition).unwrap();
        for slot in 0..24 {
            assert!(deviation[slot] >= -held[slot]);
        }
        // Slot 0: observed −12, held 0, clamped to −0.
        assert_abs_diff_eq!(deviation[0], 0.0);
    }

    #[test]
    fn test_shortfalls() {
        let mut held = vec![10.0; 24];
        held[2] = 30.0;
        held[5] = 25.0;
        let reconciliation =
            Reconciliation::try_new(series([20.0; 24]), series(held), ShortfallPolicy::Unclamped)
                .unwrap();
        assert_eq!(reconciliation.shortfalls().collect_vec(), [2, 5]);
        assert_abs_diff_eq!(reconciliation.total_shortfall(), -15.0);
        assert_abs_diff_eq!(reconciliation.total_surplus(), 220.0);
    }

    #[test]
    fn test_length_mismatch() {
        let result = Reconciliation::try_new(
            series([0.0; 24]),
            series([0.0; 96]),
            ShortfallPolicy::default(),
        );
        assert_eq!(result.unwrap_err(), SeriesError::LengthMismatch { left: 24, right: 96 });
    }
}
