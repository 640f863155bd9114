mod average;

use std::ops::Index;

pub use self::average::AverageBySlot;
use crate::core::slot::Granularity;

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum SeriesError {
    #[error("a series must have 24 or 96 slots, got {0}")]
    InvalidLength(usize),

    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Fixed-length slot series: power, energy or price for one day or month.
///
/// The length always matches the granularity and every value is finite,
/// missing or invalid points are stored as zero.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct HourlySeries {
    granularity: Granularity,
    values: Vec<f64>,
}

impl HourlySeries {
    pub fn zeros(granularity: Granularity) -> Self {
        Self { granularity, values: vec![0.0; granularity.n_slots()] }
    }

    pub fn try_new(values: Vec<f64>) -> Result<Self, SeriesError> {
        let granularity =
            Granularity::from_n_slots(values.len()).ok_or(SeriesError::InvalidLength(values.len()))?;
        let values =
            values.into_iter().map(|value| if value.is_finite() { value } else { 0.0 }).collect();
        Ok(Self { granularity, values })
    }

    /// Build from `(slot index, value)` pairs, unset slots stay zero.
    pub fn from_slots(
        granularity: Granularity,
        slots: impl IntoIterator<Item = (usize, f64)>,
    ) -> Self {
        let mut this = Self::zeros(granularity);
        for (slot, value) in slots {
            if let Some(target) = this.values.get_mut(slot)
                && value.is_finite()
            {
                *target = value;
            }
        }
        this
    }

    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[must_use]
    pub const fn n_slots(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            granularity: self.granularity,
            values: self.values.iter().map(|value| f(*value)).map(finite_or_zero).collect(),
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|value| value * factor)
    }

    /// Combine two series slot by slot.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, SeriesError> {
        if self.n_slots() != other.n_slots() {
            return Err(SeriesError::LengthMismatch {
                left: self.n_slots(),
                right: other.n_slots(),
            });
        }
        Ok(Self {
            granularity: self.granularity,
            values: self.iter().zip(other.iter()).map(|(lhs, rhs)| finite_or_zero(f(lhs, rhs))).collect(),
        })
    }
}

impl Index<usize> for HourlySeries {
    type Output = f64;

    fn index(&self, slot: usize) -> &Self::Output {
        &self.values[slot]
    }
}

impl<'a> IntoIterator for &'a HourlySeries {
    type Item = f64;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter().copied()
    }
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Round to the given number of decimal places.
#[must_use]
pub fn round_to(value: f64, precision: u8) -> f64 {
    let scale = 10_f64.powi(i32::from(precision));
    (value * scale).round() / scale
}
