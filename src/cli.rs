mod allocate;
mod arbitrage;
mod correct;
mod extract;
mod input;
mod plan;
mod profit;
mod reconcile;
mod stations;

use std::{fmt::Display, path::PathBuf};

use clap::{Parser, Subcommand};

use crate::{
    cli::{
        allocate::AllocateArgs,
        arbitrage::ArbitrageArgs,
        correct::CorrectArgs,
        extract::ExtractArgs,
        plan::PlanArgs,
        profit::ProfitArgs,
        reconcile::ReconcileArgs,
        stations::StationsArgs,
    },
    context::RunContext,
    core::slot::Granularity,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Slot resolution of the series.
    #[clap(long, env = "GRANULARITY", value_enum, default_value_t = Granularity::Hourly, global = true)]
    pub granularity: Granularity,

    /// Decimal places of the allocated values.
    #[clap(long, env = "PRECISION", default_value = "2", global = true)]
    pub precision: u8,

    /// Append one line per run to this CSV journal.
    #[clap(long = "journal", env = "JOURNAL_PATH", global = true)]
    pub journal_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Spread a total over the slots proportionally to a weight column.
    Allocate(Box<AllocateArgs>),

    /// Move the morning and evening output into the core hours.
    Arbitrage(Box<ArbitrageArgs>),

    /// Compare the observed series against the held position.
    Reconcile(Box<ReconcileArgs>),

    /// Correct a forecast with a station coefficient and compare against the contract.
    Correct(Box<CorrectArgs>),

    /// Derive the annual trading plan.
    Plan(Box<PlanArgs>),

    /// Calculate the excess profit of the position.
    Profit(Box<ProfitArgs>),

    /// Extract settlement subjects from bills.
    Extract(Box<ExtractArgs>),

    /// Manage the station parameter table.
    Stations(StationsArgs),
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Allocate(_) => "allocate",
            Self::Arbitrage(_) => "arbitrage",
            Self::Reconcile(_) => "reconcile",
            Self::Correct(_) => "correct",
            Self::Plan(_) => "plan",
            Self::Profit(_) => "profit",
            Self::Extract(_) => "extract",
            Self::Stations(_) => "stations",
        }
    }

    pub fn run(self, context: &mut RunContext) -> Result<Option<Summary>> {
        match self {
            Self::Allocate(args) => args.run(context),
            Self::Arbitrage(args) => args.run(context),
            Self::Reconcile(args) => args.run(context),
            Self::Correct(args) => args.run(context),
            Self::Plan(args) => args.run(context),
            Self::Profit(args) => args.run(context),
            Self::Extract(args) => args.run(context),
            Self::Stations(args) => args.run(),
        }
    }
}

/// Headline of a finished run.
#[must_use]
pub struct Summary {
    pub subject: String,
    pub figure: String,
}

impl Summary {
    pub fn new(subject: impl Into<String>, figure: impl Display) -> Self {
        Self { subject: subject.into(), figure: figure.to_string() }
    }
}
