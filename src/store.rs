//! Files kept between runs.

pub mod journal;
pub mod stations;
