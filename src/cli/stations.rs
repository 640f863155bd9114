use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    cli::Summary,
    prelude::*,
    store::stations::{RatioUpdate, StationBook},
    tables::build_stations_table,
};

#[derive(Parser)]
pub struct StationsArgs {
    #[clap(long = "stations", env = "STATIONS_PATH", default_value = "stations.json", global = true)]
    path: PathBuf,

    #[command(subcommand)]
    command: StationsCommand,
}

#[derive(Subcommand)]
pub enum StationsCommand {
    /// Print the table.
    List,

    /// Add a station or change some of its ratios.
    Set(SetArgs),

    /// Remove a station.
    Remove {
        name: String,
    },
}

#[derive(Parser)]
pub struct SetArgs {
    name: String,

    #[clap(long = "online", allow_negative_numbers = true)]
    online_ratio: Option<f64>,

    #[clap(long = "priority", allow_negative_numbers = true)]
    priority_ratio: Option<f64>,

    #[clap(long = "curtailment", allow_negative_numbers = true)]
    curtailment_ratio: Option<f64>,

    #[clap(long = "mechanism", allow_negative_numbers = true)]
    mechanism_ratio: Option<f64>,
}

impl StationsArgs {
    pub fn run(self) -> Result<Option<Summary>> {
        let mut book = StationBook::read_from(&self.path)?;
        let summary = match self.command {
            StationsCommand::List => None,
            StationsCommand::Set(args) => {
                let update = RatioUpdate {
                    online: args.online_ratio,
                    priority: args.priority_ratio,
                    curtailment: args.curtailment_ratio,
                    mechanism: args.mechanism_ratio,
                };
                let coefficient = book.set(&args.name, update)?.value();
                book.write_to(&self.path)?;
                info!(name = %args.name, coefficient, "saved");
                Some(Summary::new(args.name, coefficient))
            }
            StationsCommand::Remove { name } => {
                ensure!(book.remove(&name), "station `{name}` is not in `{}`", self.path.display());
                book.write_to(&self.path)?;
                info!(%name, "removed");
                Some(Summary::new(name, "removed"))
            }
        };
        println!("{}", build_stations_table(&book));
        Ok(summary)
    }
}
