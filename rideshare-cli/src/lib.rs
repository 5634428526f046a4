//! Command-line interface for publishing and browsing shared rides.
#![forbid(unsafe_code)]

use std::{io::Write, sync::Arc};

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use mockable::DefaultClock;
use rideshare_core::SharedClock;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[cfg(feature = "store-sqlite")]
mod commands;
mod error;
mod output;
pub mod shell;
mod store_args;

pub use error::CliError;
use output::{Report, write_report};
use shell::ScreenKind;
use store_args::StoreArgs;

const ARG_FROM: &str = "from";
const ARG_TO: &str = "to";

/// Run the rideshare CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose)?;
    let clock: SharedClock = Arc::new(DefaultClock);
    let mut stdout = std::io::stdout().lock();
    run_with(cli, clock, &mut stdout)
}

fn init_logging(verbosity: u8) -> Result<(), CliError> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(level, config, std::io::stderr())?;
    Ok(())
}

fn run_with(cli: Cli, clock: SharedClock, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = execute(cli.command, clock)?;
    write_report(writer, &report, cli.json)
}

#[cfg(feature = "store-sqlite")]
fn execute(command: Command, clock: SharedClock) -> Result<Report, CliError> {
    commands::execute(command, clock)
}

#[cfg(not(feature = "store-sqlite"))]
fn execute(_command: Command, _clock: SharedClock) -> Result<Report, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "opening a ride store",
    })
}

#[derive(Debug, Parser)]
#[command(
    name = "rideshare",
    about = "Publish and browse rides offered by drivers",
    version
)]
struct Cli {
    /// Log more detail to stderr (repeat for more).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a fresh store holding the sample drivers and rides.
    Init(InitArgs),
    /// Publish a ride for a registered driver.
    CreateRide(CreateRideArgs),
    /// List rides on a date, optionally restricted to one route.
    Rides(RidesArgs),
    /// List the cities rides depart from.
    Departures(DeparturesArgs),
    /// List the destinations reachable from a city.
    Arrivals(ArrivalsArgs),
    /// List the days on which a route is served.
    Dates(DatesArgs),
    /// List the days of a month with any ride.
    Events(EventsArgs),
    /// Render one screen of the presentation shell.
    Screen(ScreenArgs),
}

#[derive(Debug, Args)]
struct InitArgs {
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Debug, Args)]
struct CreateRideArgs {
    /// Email of the driver offering the ride.
    #[arg(long, value_name = "email")]
    driver: String,
    /// Departure city.
    #[arg(long = ARG_FROM, value_name = "city")]
    from: String,
    /// Arrival city.
    #[arg(long = ARG_TO, value_name = "city")]
    to: String,
    /// Day of the ride (YYYY-MM-DD).
    #[arg(long, value_name = "date")]
    date: NaiveDate,
    /// Seats offered.
    #[arg(long, value_name = "count")]
    seats: u32,
    /// Price per seat.
    #[arg(long, value_name = "amount")]
    price: f64,
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Debug, Args)]
struct RidesArgs {
    /// Day to list (YYYY-MM-DD).
    #[arg(long, value_name = "date")]
    date: NaiveDate,
    /// Departure city; requires --to.
    #[arg(long = ARG_FROM, value_name = "city")]
    from: Option<String>,
    /// Arrival city; requires --from.
    #[arg(long = ARG_TO, value_name = "city")]
    to: Option<String>,
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Debug, Args)]
struct DeparturesArgs {
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Debug, Args)]
struct ArrivalsArgs {
    /// Departure city.
    #[arg(long = ARG_FROM, value_name = "city")]
    from: String,
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Debug, Args)]
struct DatesArgs {
    /// Departure city.
    #[arg(long = ARG_FROM, value_name = "city")]
    from: String,
    /// Arrival city.
    #[arg(long = ARG_TO, value_name = "city")]
    to: String,
    /// Only list days in the month containing this date.
    #[arg(long, value_name = "date")]
    month: Option<NaiveDate>,
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Debug, Args)]
struct EventsArgs {
    /// Any date in the month to list (defaults to today).
    #[arg(long, value_name = "date")]
    month: Option<NaiveDate>,
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Debug, Args)]
struct ScreenArgs {
    /// Screen to show.
    #[arg(value_enum, default_value = "main-menu")]
    screen: ScreenKind,
    #[command(flatten)]
    store: StoreArgs,
}

#[cfg(test)]
mod tests;
