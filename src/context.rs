//! Per-run state passed explicitly into loaders and operations.

use std::fmt::Display;

use crate::{core::slot::Granularity, prelude::*};

#[must_use]
#[derive(Clone, Debug)]
pub struct Warning {
    /// Sheet, file or row the warning is about.
    pub scope: String,

    pub message: String,
}

#[must_use]
#[derive(Debug, bon::Builder)]
pub struct RunContext {
    #[builder(default)]
    pub granularity: Granularity,

    /// Decimal places of the allocated values.
    #[builder(default = 2)]
    pub precision: u8,

    #[builder(skip)]
    warnings: Vec<Warning>,
}

impl RunContext {
    /// Record a skipped row, sheet or file and carry on.
    pub fn warn(&mut self, scope: impl Into<String>, message: impl Display) {
        let scope = scope.into();
        let message = message.to_string();
        warn!(%scope, %message, "skipped");
        self.warnings.push(Warning { scope, message });
    }

    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}
