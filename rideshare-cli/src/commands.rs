//! Subcommand handlers backed by the SQLite ride store.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{info, warn};
use rideshare_core::{
    Clock, NewRide, RideFacade, RideService, RideStore, SharedClock, SqliteRideStore, StoreConfig,
};

use crate::shell::Shell;
use crate::store_args::require_existing_store;
use crate::{ARG_FROM, ARG_TO, CliError, Command, CreateRideArgs, Report, StoreArgs};

pub(crate) fn execute(command: Command, clock: SharedClock) -> Result<Report, CliError> {
    match command {
        Command::Init(args) => init(args.store, clock),
        Command::CreateRide(args) => create_ride(args, clock),
        Command::Rides(args) => {
            let route = route(args.from, args.to)?;
            with_facade(args.store, clock, |facade| {
                let rides = match &route {
                    Some((origin, destination)) => facade.rides(origin, destination, args.date)?,
                    None => facade.rides_on_date(args.date)?,
                };
                Ok(Report::Rides(rides))
            })
        }
        Command::Departures(args) => with_facade(args.store, clock, |facade| {
            Ok(Report::Cities(facade.departure_cities()?))
        }),
        Command::Arrivals(args) => with_facade(args.store, clock, |facade| {
            Ok(Report::Cities(facade.arrival_cities(&args.from)?))
        }),
        Command::Dates(args) => with_facade(args.store, clock, |facade| {
            let dates = match args.month {
                Some(reference) => facade.ride_dates_in_month(&args.from, &args.to, reference)?,
                None => facade.ride_dates(&args.from, &args.to)?,
            };
            Ok(Report::Dates(dates))
        }),
        Command::Events(args) => {
            let reference = args.month.unwrap_or_else(|| today(&clock));
            with_facade(args.store, clock, |facade| {
                Ok(Report::Dates(facade.event_dates_in_month(reference)?))
            })
        }
        Command::Screen(args) => {
            let today = today(&clock);
            with_facade(args.store, clock, |facade| {
                let mut shell = Shell::new(facade, today);
                shell.show(args.screen);
                Ok(Report::Screen {
                    screen: shell.render()?,
                })
            })
        }
    }
}

fn today(clock: &SharedClock) -> NaiveDate {
    clock.local().date_naive()
}

fn route(
    from: Option<String>,
    to: Option<String>,
) -> Result<Option<(String, String)>, CliError> {
    match (from, to) {
        (Some(origin), Some(destination)) => Ok(Some((origin, destination))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(CliError::IncompleteRoute {
            given: ARG_FROM,
            missing: ARG_TO,
        }),
        (None, Some(_)) => Err(CliError::IncompleteRoute {
            given: ARG_TO,
            missing: ARG_FROM,
        }),
    }
}

fn init(args: StoreArgs, clock: SharedClock) -> Result<Report, CliError> {
    let config = args.into_config()?.resetting_existing();
    let mut store = SqliteRideStore::open(&config, clock)?;
    store.seed_initial_data();
    let departures = store.list_departure_cities()?;
    store.close()?;
    info!("initialised ride store at {}", config.describe());
    Ok(Report::Initialised {
        location: config.describe(),
        departures,
    })
}

fn create_ride(args: CreateRideArgs, clock: SharedClock) -> Result<Report, CliError> {
    let CreateRideArgs {
        driver,
        from,
        to,
        date,
        seats,
        price,
        store,
    } = args;
    let ride = NewRide::new(from, to, date, seats, price)?;
    with_facade(store, clock, |facade| {
        Ok(Report::Ride(facade.create_ride(&ride, &driver)?))
    })
}

/// Open the configured store, hand it to `action` behind a facade, then close
/// it.
fn with_facade<T>(
    args: StoreArgs,
    clock: SharedClock,
    action: impl FnOnce(&Arc<dyn RideFacade>) -> Result<T, CliError>,
) -> Result<T, CliError> {
    let config = args.into_config()?;
    let service = open_service(&config, clock)?;
    let facade: Arc<dyn RideFacade> = Arc::clone(&service) as Arc<dyn RideFacade>;
    let outcome = action(&facade);
    drop(facade);
    let closed = close_service(service);
    match outcome {
        Ok(value) => closed.map(|()| value),
        Err(err) => {
            if let Err(close_err) = closed {
                warn!("failed to close ride store after an earlier error: {close_err}");
            }
            Err(err)
        }
    }
}

/// Close the store once no facade handle remains.
///
/// A handle that is still shared is left to close when its last owner drops.
fn close_service(service: Arc<RideService<SqliteRideStore>>) -> Result<(), CliError> {
    match Arc::try_unwrap(service) {
        Ok(service) => Ok(service.into_inner()?.close()?),
        Err(shared) => {
            warn!(
                "ride store still has {} other handles; closing it on drop",
                Arc::strong_count(&shared) - 1
            );
            Ok(())
        }
    }
}

fn open_service(
    config: &StoreConfig,
    clock: SharedClock,
) -> Result<Arc<RideService<SqliteRideStore>>, CliError> {
    require_existing_store(config)?;
    let store = SqliteRideStore::open(config, clock)?;
    Ok(Arc::new(RideService::new(store)))
}
