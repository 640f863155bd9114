use serde::{Deserialize, Serialize};

use crate::core::{
    reconcile::{Reconciliation, ShortfallPolicy},
    series::{HourlySeries, SeriesError},
};

/// Per-station correction ratios.
///
/// The coefficient itself is never stored: it is derived from the ratios on every read.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, bon::Builder)]
pub struct StationCoefficient {
    #[builder(into)]
    pub name: String,

    #[builder(default = 1.0)]
    #[serde(default = "default_online_ratio")]
    pub online_ratio: f64,

    #[builder(default)]
    #[serde(default)]
    pub priority_ratio: f64,

    #[builder(default)]
    #[serde(default)]
    pub curtailment_ratio: f64,

    #[builder(default)]
    #[serde(default)]
    pub mechanism_ratio: f64,
}

const fn default_online_ratio() -> f64 {
    1.0
}

impl StationCoefficient {
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.online_ratio - self.priority_ratio - self.curtailment_ratio - self.mechanism_ratio
    }

    #[must_use]
    pub fn ratios(&self) -> [f64; 4] {
        [self.online_ratio, self.priority_ratio, self.curtailment_ratio, self.mechanism_ratio]
    }

    /// Scale the forecast by the coefficient and compare it against the contracted series.
    ///
    /// A shortfall is never reported below the negated contracted amount.
    pub fn correct(
        &self,
        forecast: &HourlySeries,
        contracted: HourlySeries,
    ) -> Result<Reconciliation, SeriesError> {
        Reconciliation::try_new(
            forecast.scaled(self.value()),
            contracted,
            ShortfallPolicy::ClampToPosition,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_value() {
        let station = StationCoefficient::builder()
            .name("风电一场")
            .online_ratio(0.95)
            .priority_ratio(0.1)
            .curtailment_ratio(0.05)
            .mechanism_ratio(0.2)
            .build();
        assert_abs_diff_eq!(station.value(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_defaults() {
        let station = StationCoefficient::new("光伏二场");
        assert_abs_diff_eq!(station.value(), 1.0);
        let parsed: StationCoefficient = serde_json::from_str(r#"{"name": "光伏二场"}"#).unwrap();
        assert_eq!(parsed, station);
    }

    #[test]
    fn test_correct() {
        let station = StationCoefficient::builder().name("A").online_ratio(0.5).build();
        let forecast = HourlySeries::try_new(vec![100.0; 24]).unwrap();
        let mut contracted = vec![40.0; 24];
        contracted[0] = 200.0;
        let corrected =
            station.correct(&forecast, HourlySeries::try_new(contracted).unwrap()).unwrap();
        assert_abs_diff_eq!(corrected.deviation[1], 10.0);
        // 50 − 200 = −150, clamped at −200 stays −150.
        assert_abs_diff_eq!(corrected.deviation[0], -150.0);
        assert_abs_diff_eq!(corrected.observed[0], 50.0);
    }

    #[test]
    fn test_correct_clamps_at_position() {
        let station = StationCoefficient::builder().name("B").online_ratio(0.0).mechanism_ratio(0.5).build();
        let forecast = HourlySeries::try_new(vec![100.0; 24]).unwrap();
        let contracted = HourlySeries::try_new(vec![10.0; 24]).unwrap();
        let corrected = station.correct(&forecast, contracted).unwrap();
        // −50 − 10 = −60, floored at −10.
        assert_abs_diff_eq!(corrected.deviation[3], -10.0);
    }
}
