//! Data access for drivers and rides.
//!
//! The [`RideStore`] trait is the only read and write path to persisted ride
//! data. Mutating operations run inside a single transaction each; query
//! operations return plain values.

use chrono::{NaiveDate, NaiveDateTime};
use log::{error, info};
use mockable::Clock;

use crate::{Driver, NewRide, Ride, RideStoreError, SeedPlan};

#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteRideStore, StoreConnectionError};

/// Persistent collection of drivers and their rides.
///
/// Implementations hold a clock so that "now" can be fixed in tests. All date
/// lists are distinct and in ascending order; city lists are distinct and in
/// ascending byte order.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use chrono::NaiveDate;
/// use mockable::DefaultClock;
/// use rideshare_core::{Driver, NewRide, RideStore, test_support::MemoryRideStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = MemoryRideStore::new(Arc::new(DefaultClock));
/// store.create_driver(&Driver::new("driver1@gmail.com", "Aitor Fernandez")?)?;
///
/// let date = NaiveDate::from_ymd_opt(2999, 5, 15).expect("valid date");
/// let ride = NewRide::new("Donostia", "Bilbo", date, 4, 7.0)?;
/// store.create_ride(&ride, "driver1@gmail.com")?;
///
/// assert_eq!(store.list_departure_cities()?, vec!["Donostia".to_owned()]);
/// # Ok(())
/// # }
/// ```
pub trait RideStore {
    /// Clock used to decide whether a ride is in the future.
    fn clock(&self) -> &dyn Clock;

    /// Register a new driver.
    ///
    /// Fails with [`RideStoreError::DuplicateDriver`] when the email is taken.
    fn create_driver(&mut self, driver: &Driver) -> Result<(), RideStoreError>;

    /// Look a driver up by email.
    fn find_driver(&self, email: &str) -> Result<Option<Driver>, RideStoreError>;

    /// Publish a ride for the driver registered under `driver_email`.
    ///
    /// The date is checked against the clock before any transaction starts.
    /// An unknown driver yields [`RideStoreError::DriverNotFound`] and leaves
    /// the store untouched. A ride repeating one of the driver's existing
    /// (origin, destination, date) trips yields
    /// [`RideStoreError::DuplicateRide`].
    fn create_ride(&mut self, ride: &NewRide, driver_email: &str) -> Result<Ride, RideStoreError>;

    /// Every ride on exactly `date`, across all routes and drivers.
    fn find_rides_by_date(&self, date: NaiveDate) -> Result<Vec<Ride>, RideStoreError>;

    /// Rides on one route on exactly `date`.
    fn find_rides(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ride>, RideStoreError>;

    /// Rides owned by one driver, ordered by date.
    fn rides_by_driver(&self, email: &str) -> Result<Vec<Ride>, RideStoreError>;

    /// Cities that are the origin of at least one ride.
    fn list_departure_cities(&self) -> Result<Vec<String>, RideStoreError>;

    /// Destinations of rides departing from `origin`.
    fn list_arrival_cities(&self, origin: &str) -> Result<Vec<String>, RideStoreError>;

    /// Dates in the month of `reference` with a ride on the route.
    fn list_ride_dates_in_month(
        &self,
        origin: &str,
        destination: &str,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError>;

    /// Dates with a ride on the route, in any month.
    fn list_ride_dates(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<NaiveDate>, RideStoreError>;

    /// Dates in the month of `reference` with any ride at all.
    fn list_event_dates_in_month(
        &self,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError>;

    /// Write every driver and ride in `plan` in one transaction.
    ///
    /// Ride dates are not checked against the clock. Nothing is written when
    /// any insert fails.
    fn persist_seed(&mut self, plan: &SeedPlan) -> Result<(), RideStoreError>;

    /// Populate the store with the sample drivers and rides.
    ///
    /// Best effort: failures are logged and swallowed, so callers cannot tell
    /// whether seeding happened. Running it twice fails on the duplicate
    /// drivers and leaves the first run's data in place.
    fn seed_initial_data(&mut self) {
        let today = self.clock().local().date_naive();
        let plan = match SeedPlan::anchored_at(today) {
            Ok(plan) => plan,
            Err(err) => {
                error!("failed to build seed data for {today}: {err}");
                return;
            }
        };
        match self.persist_seed(&plan) {
            Ok(()) => info!(
                "seeded {} drivers and {} rides",
                plan.drivers.len(),
                plan.ride_count()
            ),
            Err(err) => error!("seeding the ride store failed: {err}"),
        }
    }
}

/// Current local time according to `clock`, without a time zone.
pub(crate) fn local_now(clock: &dyn Clock) -> NaiveDateTime {
    clock.local().naive_local()
}

pub(crate) fn log_create_ride(ride: &NewRide, driver_email: &str) {
    info!(
        "create ride: from={} to={} driver={} date={}",
        ride.origin, ride.destination, driver_email, ride.date
    );
}
