use chrono::Timelike;
use itertools::Itertools;

use crate::core::{series::HourlySeries, slot::Granularity};

impl<T> AverageBySlot for T where T: ?Sized {}

pub trait AverageBySlot {
    /// Average timestamped readings into the slots of the day.
    ///
    /// Slots without any reading are left at zero.
    fn average_by_slot<K>(self, granularity: Granularity) -> HourlySeries
    where
        Self: Sized + Iterator<Item = (K, f64)>,
        K: Timelike,
    {
        let n_slots = granularity.n_slots();
        let minutes_per_slot = 24 * 60 / n_slots;
        let mut sums = vec![0.0; n_slots];
        let mut weights = vec![0_u32; n_slots];
        for (timestamp, value) in self.filter(|(_, value)| value.is_finite()) {
            let slot = (timestamp.hour() * 60 + timestamp.minute()) as usize / minutes_per_slot;
            sums[slot] += value;
            weights[slot] += 1;
        }
        let averages = sums
            .into_iter()
            .zip(weights)
            .map(|(sum, weight)| if weight == 0 { 0.0 } else { sum / f64::from(weight) })
            .collect_vec();
        HourlySeries::from_slots(granularity, averages.into_iter().enumerate())
    }
}
