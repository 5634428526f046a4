//! Test-only, in-memory `RideStore` and a fixed clock used by unit and
//! behaviour tests.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use mockable::Clock;

use crate::store::{local_now, log_create_ride};
use crate::{
    Driver, MonthRange, NewRide, Ride, RideNumber, RideStore, RideStoreError, SeedPlan,
    SharedClock, ensure_departs_after,
};

/// Build a calendar date, falling back to the epoch for invalid input.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Clock frozen at one local instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Local>,
}

impl FixedClock {
    /// Freeze the clock at `moment` in the local time zone.
    #[must_use]
    pub fn at(moment: NaiveDateTime) -> Self {
        let now = Local
            .from_local_datetime(&moment)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&moment));
        Self { now }
    }

    /// Freeze the clock at midday on `day`.
    #[must_use]
    pub fn at_noon(day: NaiveDate) -> Self {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::at(NaiveDateTime::new(day, noon))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }
}

/// In-memory `RideStore` implementation used in tests.
///
/// Queries scan every ride and are intended only for small datasets.
pub struct MemoryRideStore {
    clock: SharedClock,
    drivers: Vec<Driver>,
    rides: Vec<Ride>,
    next_number: RideNumber,
}

impl std::fmt::Debug for MemoryRideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRideStore")
            .field("drivers", &self.drivers)
            .field("rides", &self.rides)
            .finish_non_exhaustive()
    }
}

impl MemoryRideStore {
    /// Create an empty store reading "now" from `clock`.
    #[must_use]
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            drivers: Vec::new(),
            rides: Vec::new(),
            next_number: 1,
        }
    }

    fn has_driver(&self, email: &str) -> bool {
        self.drivers.iter().any(|driver| driver.email == email)
    }

    fn push_ride(&mut self, ride: &NewRide, driver_email: &str) -> Ride {
        let stored = ride.clone().into_ride(self.next_number, driver_email);
        self.next_number += 1;
        self.rides.push(stored.clone());
        stored
    }

    fn matching(&self, predicate: impl Fn(&Ride) -> bool) -> Vec<Ride> {
        self.rides
            .iter()
            .filter(|ride| predicate(ride))
            .cloned()
            .collect()
    }
}

fn sorted_distinct<T: Ord>(mut values: Vec<T>) -> Vec<T> {
    values.sort_unstable();
    values.dedup();
    values
}

impl RideStore for MemoryRideStore {
    fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    fn create_driver(&mut self, driver: &Driver) -> Result<(), RideStoreError> {
        if self.has_driver(&driver.email) {
            return Err(RideStoreError::DuplicateDriver {
                email: driver.email.clone(),
            });
        }
        self.drivers.push(driver.clone());
        Ok(())
    }

    fn find_driver(&self, email: &str) -> Result<Option<Driver>, RideStoreError> {
        Ok(self
            .drivers
            .iter()
            .find(|driver| driver.email == email)
            .cloned())
    }

    fn create_ride(&mut self, ride: &NewRide, driver_email: &str) -> Result<Ride, RideStoreError> {
        log_create_ride(ride, driver_email);
        ensure_departs_after(ride.date, local_now(self.clock()))?;
        if !self.has_driver(driver_email) {
            return Err(RideStoreError::DriverNotFound {
                email: driver_email.to_owned(),
            });
        }
        let repeated = self
            .rides
            .iter()
            .any(|stored| stored.driver_email == driver_email && ride.same_trip_as(stored));
        if repeated {
            return Err(RideStoreError::DuplicateRide {
                driver_email: driver_email.to_owned(),
                origin: ride.origin.clone(),
                destination: ride.destination.clone(),
                date: ride.date,
            });
        }
        Ok(self.push_ride(ride, driver_email))
    }

    fn find_rides_by_date(&self, date: NaiveDate) -> Result<Vec<Ride>, RideStoreError> {
        Ok(self.matching(move |ride| ride.date == date))
    }

    fn find_rides(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ride>, RideStoreError> {
        Ok(self.matching(move |ride| {
            ride.origin == origin && ride.destination == destination && ride.date == date
        }))
    }

    fn rides_by_driver(&self, email: &str) -> Result<Vec<Ride>, RideStoreError> {
        let mut rides = self.matching(move |ride| ride.driver_email == email);
        rides.sort_by_key(|ride| (ride.date, ride.number));
        Ok(rides)
    }

    fn list_departure_cities(&self) -> Result<Vec<String>, RideStoreError> {
        Ok(sorted_distinct(
            self.rides.iter().map(|ride| ride.origin.clone()).collect(),
        ))
    }

    fn list_arrival_cities(&self, origin: &str) -> Result<Vec<String>, RideStoreError> {
        Ok(sorted_distinct(
            self.rides
                .iter()
                .filter(|ride| ride.origin == origin)
                .map(|ride| ride.destination.clone())
                .collect(),
        ))
    }

    fn list_ride_dates_in_month(
        &self,
        origin: &str,
        destination: &str,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        let month = MonthRange::containing(reference);
        Ok(self
            .list_ride_dates(origin, destination)?
            .into_iter()
            .filter(|date| month.contains(*date))
            .collect())
    }

    fn list_ride_dates(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        Ok(sorted_distinct(
            self.rides
                .iter()
                .filter(|ride| ride.origin == origin && ride.destination == destination)
                .map(|ride| ride.date)
                .collect(),
        ))
    }

    fn list_event_dates_in_month(
        &self,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        let month = MonthRange::containing(reference);
        Ok(sorted_distinct(
            self.rides
                .iter()
                .map(|ride| ride.date)
                .filter(|date| month.contains(*date))
                .collect(),
        ))
    }

    fn persist_seed(&mut self, plan: &SeedPlan) -> Result<(), RideStoreError> {
        let mut staged = Self {
            clock: self.clock.clone(),
            drivers: self.drivers.clone(),
            rides: self.rides.clone(),
            next_number: self.next_number,
        };
        for entry in &plan.drivers {
            staged.create_driver(&entry.driver)?;
            for ride in &entry.rides {
                staged.push_ride(ride, &entry.driver.email);
            }
        }
        *self = staged;
        Ok(())
    }
}
