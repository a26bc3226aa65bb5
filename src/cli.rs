mod backend;
mod bill;
mod billing;
mod calendar;
mod live;
mod meter;

use clap::{Parser, Subcommand};

use crate::cli::{
    backend::BackendArgs,
    bill::BillArgs,
    calendar::CalendarArgs,
    live::LiveArgs,
    meter::RegisterArgs,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Calculate the bill for the given usage, offline.
    #[clap(name = "bill")]
    Bill(BillArgs),

    /// Check that the backend is up.
    #[clap(name = "status")]
    Status(BackendArgs),

    /// Main command: poll the meter telemetry and the devices until interrupted.
    #[clap(name = "live")]
    Live(Box<LiveArgs>),

    /// List the registered devices and their activity.
    #[clap(name = "devices")]
    Devices(BackendArgs),

    /// Register a meter with the account.
    #[clap(name = "register")]
    Register(Box<RegisterArgs>),

    /// Show the completed billing cycles.
    #[clap(name = "history")]
    History(BackendArgs),

    /// Show the monthly billing calendar.
    #[clap(name = "calendar")]
    Calendar(Box<CalendarArgs>),

    /// Close the current billing cycle at the latest meter reading.
    #[clap(name = "reading")]
    Reading(BackendArgs),
}

impl Command {
    pub async fn run(self) -> crate::prelude::Result {
        match self {
            Self::Bill(args) => {
                args.run();
                Ok(())
            }
            Self::Status(args) => meter::status(&args).await,
            Self::Live(args) => args.run().await,
            Self::Devices(args) => meter::devices(&args).await,
            Self::Register(args) => args.run().await,
            Self::History(args) => billing::history(&args).await,
            Self::Calendar(args) => args.run().await,
            Self::Reading(args) => billing::take_reading(&args).await,
        }
    }
}
