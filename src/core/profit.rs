//! Excess profit from the spread between the spot and the contract price.

use crate::{
    core::series::{HourlySeries, SeriesError},
    quantity::{currency::Yuan, energy::MegawattHours, price::YuanPerMegawattHour},
};

#[must_use]
#[derive(Clone, Debug)]
pub struct ExcessProfit {
    pub position: HourlySeries,

    /// Spot minus contract price.
    pub spread: HourlySeries,

    /// Position times spread.
    pub profit: HourlySeries,
}

#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct ProfitSummary {
    pub position: MegawattHours,
    pub gain: Yuan,
    pub loss: Yuan,
    pub net: Yuan,
}

impl ExcessProfit {
    pub fn try_new(
        position: HourlySeries,
        spot: &HourlySeries,
        contract: &HourlySeries,
    ) -> Result<Self, SeriesError> {
        let spread = spot.zip_with(contract, |spot, contract| spot - contract)?;
        let profit = position.zip_with(&spread, |position, spread| {
            (MegawattHours(position) * YuanPerMegawattHour(spread)).0
        })?;
        Ok(Self { position, spread, profit })
    }

    /// 0-based slots losing money.
    pub fn losses(&self) -> impl Iterator<Item = usize> + '_ {
        self.profit.iter().enumerate().filter(|(_, profit)| *profit < 0.0).map(|(slot, _)| slot)
    }

    pub fn summary(&self) -> ProfitSummary {
        let gain = self.profit.iter().filter(|profit| *profit > 0.0).map(Yuan).sum::<Yuan>();
        let loss = self.profit.iter().filter(|profit| *profit < 0.0).map(Yuan).sum::<Yuan>();
        ProfitSummary {
            position: MegawattHours(self.position.total()),
            gain: gain.round_to_fen(),
            loss: loss.round_to_fen(),
            net: (gain + loss).round_to_fen(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_excess_profit() {
        let position = HourlySeries::try_new(vec![10.0; 24]).unwrap();
        let spot = HourlySeries::try_new((0..24).map(|hour| 300.0 + f64::from(hour) * 10.0).collect())
            .unwrap();
        let contract = HourlySeries::try_new(vec![400.0; 24]).unwrap();
        let profit = ExcessProfit::try_new(position, &spot, &contract).unwrap();

        assert_abs_diff_eq!(profit.spread[0], -100.0);
        assert_abs_diff_eq!(profit.profit[0], -1000.0);
        assert_abs_diff_eq!(profit.profit[10], 0.0);
        assert_abs_diff_eq!(profit.profit[23], 1300.0);
        assert_eq!(profit.losses().collect_vec(), (0..10).collect_vec());

        let summary = profit.summary();
        assert_abs_diff_eq!(summary.position.0, 240.0);
        // Gains: 100 × (1 + … + 13), losses: −100 × (1 + … + 10).
        assert_abs_diff_eq!(summary.gain.0, 9100.0);
        assert_abs_diff_eq!(summary.loss.0, -5500.0);
        assert_abs_diff_eq!(summary.net.0, 3600.0);
    }
}
