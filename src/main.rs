#![allow(clippy::doc_markdown)]

mod api;
mod billing;
mod calendar;
mod cli;
mod dashboard;
mod prelude;
mod quantity;
mod tables;
mod tariff;

use clap::{Parser, crate_version};

use crate::{cli::Args, prelude::*};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    Args::parse().command.run().await?;

    info!("done!");
    Ok(())
}
