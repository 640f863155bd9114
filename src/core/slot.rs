//! Time slots, hour ranges and months.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// 24 one-hour slots.
    #[default]
    Hourly,

    /// 96 fifteen-minute slots.
    QuarterHourly,
}

impl Granularity {
    #[must_use]
    pub const fn n_slots(self) -> usize {
        match self {
            Self::Hourly => 24,
            Self::QuarterHourly => 96,
        }
    }

    pub const fn from_n_slots(n_slots: usize) -> Option<Self> {
        match n_slots {
            24 => Some(Self::Hourly),
            96 => Some(Self::QuarterHourly),
            _ => None,
        }
    }

    /// 1-based hour the 0-based slot belongs to.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn hour_of(self, slot: usize) -> u8 {
        (slot * 24 / self.n_slots()) as u8 + 1
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hourly => write!(f, "hourly"),
            Self::QuarterHourly => write!(f, "quarter-hourly"),
        }
    }
}

/// Inclusive range of 1-based hours.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HourRange {
    start: u8,
    end: u8,
}

impl HourRange {
    /// Clip both ends to `1..=24` and swap them if inverted.
    pub fn new(start: i64, end: i64) -> Self {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let clip = |hour: i64| hour.clamp(1, 24) as u8;
        let (start, end) = (clip(start), clip(end));
        if start <= end { Self { start, end } } else { Self { start: end, end: start } }
    }

    #[must_use]
    pub const fn start(self) -> u8 {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> u8 {
        self.end
    }

    #[must_use]
    pub const fn contains(self, hour: u8) -> bool {
        (self.start <= hour) && (hour <= self.end)
    }

    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        (self.start <= other.end) && (other.start <= self.end)
    }
}

impl FromStr for HourRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').unwrap_or((s, s));
        let start = start.trim().parse().with_context(|| format!("invalid start hour in `{s}`"))?;
        let end = end.trim().parse().with_context(|| format!("invalid end hour in `{s}`"))?;
        Ok(Self::new(start, end))
    }
}

impl Display for HourRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    pub fn iter() -> impl Iterator<Item = Self> {
        (1..=12).map(Self)
    }

    /// Sheet names follow the `1月`..`12月` convention.
    #[must_use]
    pub fn sheet_name(self) -> String {
        format!("{}月", self.0)
    }

    pub fn from_sheet_name(name: &str) -> Option<Self> {
        let number = name.trim().strip_suffix('月')?.trim().parse::<u8>().ok()?;
        Self::try_from(number).ok()
    }
}

impl TryFrom<u8> for Month {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self> {
        ensure!((1..=12).contains(&number), "month must be within 1..=12, got {number}");
        Ok(Self(number))
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}月", self.0)
    }
}
