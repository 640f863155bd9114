#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod context;
mod core;
mod extract;
mod io;
mod prelude;
mod quantity;
mod store;
mod tables;

use chrono::Local;
use clap::{Parser, crate_version};

use crate::{
    cli::Args,
    context::RunContext,
    prelude::*,
    store::journal::{self, Entry},
    tables::build_warnings_table,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let mut context =
        RunContext::builder().granularity(args.granularity).precision(args.precision).build();
    let command_name = args.command.name();
    let summary = args.command.run(&mut context)?;

    if !context.warnings().is_empty() {
        warn!(n_warnings = context.warnings().len(), "finished with warnings");
        println!("{}", build_warnings_table(context.warnings()));
    }
    if let (Some(path), Some(summary)) = (&args.journal_path, summary) {
        let entry = Entry {
            timestamp: Local::now(),
            command: command_name.to_owned(),
            subject: summary.subject,
            figure: summary.figure,
        };
        journal::append(path, &entry)?;
    }

    info!("done!");
    Ok(())
}
