//! Business-logic facade shared by screens and command handlers.

use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use log::error;

use crate::{NewRide, Ride, RideStore, RideStoreError};

/// Operations a front end may request.
///
/// Front ends hold the facade behind an `Arc` and never reach the store
/// directly. Implementations must be `Send + Sync` so one facade can serve
/// every screen.
pub trait RideFacade: Send + Sync {
    /// Publish a ride on behalf of `driver_email`.
    fn create_ride(&self, ride: &NewRide, driver_email: &str) -> Result<Ride, RideStoreError>;

    /// Rides on one route on one day.
    fn rides(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ride>, RideStoreError>;

    /// Every ride on one day.
    fn rides_on_date(&self, date: NaiveDate) -> Result<Vec<Ride>, RideStoreError>;

    /// Cities with at least one departing ride.
    fn departure_cities(&self) -> Result<Vec<String>, RideStoreError>;

    /// Destinations reachable from `origin`.
    fn arrival_cities(&self, origin: &str) -> Result<Vec<String>, RideStoreError>;

    /// Days in the month of `reference` on which the route is served.
    fn ride_dates_in_month(
        &self,
        origin: &str,
        destination: &str,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError>;

    /// Every day on which the route is served.
    fn ride_dates(&self, origin: &str, destination: &str)
    -> Result<Vec<NaiveDate>, RideStoreError>;

    /// Days in the month of `reference` with any ride.
    fn event_dates_in_month(&self, reference: NaiveDate)
    -> Result<Vec<NaiveDate>, RideStoreError>;
}

/// [`RideFacade`] over a single store handle.
///
/// Calls are serialised through a mutex, matching the store's one-connection,
/// one-transaction-at-a-time model.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use rideshare_core::{RideFacade, RideService, test_support::MemoryRideStore};
///
/// # fn main() -> Result<(), rideshare_core::RideStoreError> {
/// let service = RideService::new(MemoryRideStore::new(Arc::new(DefaultClock)));
/// assert!(service.departure_cities()?.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RideService<S> {
    store: Mutex<S>,
}

impl<S: RideStore + Send> RideService<S> {
    /// Wrap `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Recover the store, for example to close it.
    pub fn into_inner(self) -> Result<S, RideStoreError> {
        self.store.into_inner().map_err(unavailable)
    }

    fn with_store<T>(
        &self,
        operation: impl FnOnce(&mut S) -> Result<T, RideStoreError>,
    ) -> Result<T, RideStoreError> {
        let mut store = self.store.lock().map_err(unavailable)?;
        operation(&mut store)
    }
}

fn unavailable<T>(_: PoisonError<T>) -> RideStoreError {
    error!("ride store lock poisoned by an earlier panic");
    RideStoreError::Unavailable
}

impl<S: RideStore + Send> RideFacade for RideService<S> {
    fn create_ride(&self, ride: &NewRide, driver_email: &str) -> Result<Ride, RideStoreError> {
        self.with_store(|store| store.create_ride(ride, driver_email))
    }

    fn rides(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ride>, RideStoreError> {
        self.with_store(|store| store.find_rides(origin, destination, date))
    }

    fn rides_on_date(&self, date: NaiveDate) -> Result<Vec<Ride>, RideStoreError> {
        self.with_store(|store| store.find_rides_by_date(date))
    }

    fn departure_cities(&self) -> Result<Vec<String>, RideStoreError> {
        self.with_store(|store| store.list_departure_cities())
    }

    fn arrival_cities(&self, origin: &str) -> Result<Vec<String>, RideStoreError> {
        self.with_store(|store| store.list_arrival_cities(origin))
    }

    fn ride_dates_in_month(
        &self,
        origin: &str,
        destination: &str,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        self.with_store(|store| store.list_ride_dates_in_month(origin, destination, reference))
    }

    fn ride_dates(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        self.with_store(|store| store.list_ride_dates(origin, destination))
    }

    fn event_dates_in_month(
        &self,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        self.with_store(|store| store.list_event_dates_in_month(reference))
    }
}
