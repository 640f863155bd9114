use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{core::coefficient::StationCoefficient, prelude::*};

/// Station parameter table, persisted as pretty-printed JSON.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationBook(Vec<StationCoefficient>);

/// Ratios to change, unset ones keep their current value.
#[must_use]
#[derive(Copy, Clone, Debug, Default)]
pub struct RatioUpdate {
    pub online: Option<f64>,
    pub priority: Option<f64>,
    pub curtailment: Option<f64>,
    pub mechanism: Option<f64>,
}

impl StationBook {
    #[instrument(skip_all, fields(path = %path.display()), name = "Reading the stations…")]
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let book: Self = serde_json::from_slice(&fs::read(path)?)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        debug!(n_stations = book.0.len(), "loaded");
        Ok(book)
    }

    #[instrument(skip_all, fields(path = %path.display()), name = "Writing the stations…")]
    pub fn write_to(&self, path: &Path) -> Result {
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("failed to write `{}`", path.display()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationCoefficient> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StationCoefficient> {
        self.0.iter().find(|station| station.name == name)
    }

    /// Create the station with default ratios if needed, then apply the update.
    pub fn set(&mut self, name: &str, update: RatioUpdate) -> Result<&StationCoefficient> {
        let ratios = [update.online, update.priority, update.curtailment, update.mechanism];
        for ratio in ratios.into_iter().flatten() {
            ensure!(ratio.is_finite(), "ratios must be finite, got {ratio}");
        }
        let index = match self.0.iter().position(|station| station.name == name) {
            Some(index) => index,
            None => {
                info!(name, "adding a new station");
                self.0.push(StationCoefficient::new(name));
                self.0.len() - 1
            }
        };
        let station = &mut self.0[index];
        if let Some(online) = update.online {
            station.online_ratio = online;
        }
        if let Some(priority) = update.priority {
            station.priority_ratio = priority;
        }
        if let Some(curtailment) = update.curtailment {
            station.curtailment_ratio = curtailment;
        }
        if let Some(mechanism) = update.mechanism {
            station.mechanism_ratio = mechanism;
        }
        Ok(&self.0[index])
    }

    /// Remove the station, returning whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let n_stations = self.0.len();
        self.0.retain(|station| station.name != name);
        self.0.len() != n_stations
    }
}
