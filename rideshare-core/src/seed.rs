//! Fixed sample drivers and rides used to initialise a fresh store.
//!
//! Ride dates are anchored to the month containing "today" and the month after
//! it. Some of them may already be in the past; seeded rides skip the
//! departure-date check that [`crate::RideStore::create_ride`] applies.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{Driver, DriverError, MonthRange, NewRide, RideError};

/// A driver together with the rides it publishes.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDriver {
    /// Driver to insert.
    pub driver: Driver,
    /// Rides owned by the driver.
    pub rides: Vec<NewRide>,
}

/// The full set of records written by a seed run.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    /// Drivers in insertion order.
    pub drivers: Vec<SeedDriver>,
}

/// Errors raised while building or persisting a seed plan.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The anchor month or the month after it cannot hold a seeded day.
    #[error("cannot anchor seed rides to the month of {today}")]
    OutOfRange {
        /// Date the plan was anchored to.
        today: NaiveDate,
    },
    /// A seeded driver failed validation.
    #[error(transparent)]
    Driver(#[from] DriverError),
    /// A seeded ride failed validation.
    #[error(transparent)]
    Ride(#[from] RideError),
}

/// Which month a seeded ride falls in.
#[derive(Clone, Copy)]
enum Month {
    This,
    Next,
}

type RideRow = (&'static str, &'static str, Month, u32, u32, f64);

const DRIVERS: [(&str, &str, &[RideRow]); 3] = [
    (
        "driver1@gmail.com",
        "Aitor Fernandez",
        &[
            ("Donostia", "Bilbo", Month::This, 15, 4, 7.0),
            ("Donostia", "Bilbo", Month::Next, 15, 4, 7.0),
            ("Donostia", "Gasteiz", Month::This, 6, 4, 8.0),
            ("Bilbo", "Donostia", Month::This, 25, 4, 4.0),
            ("Donostia", "Iruña", Month::This, 7, 4, 8.0),
        ],
    ),
    (
        "driver2@gmail.com",
        "Ane Gaztañaga",
        &[
            ("Donostia", "Bilbo", Month::This, 15, 3, 3.0),
            ("Bilbo", "Donostia", Month::This, 25, 2, 5.0),
            ("Eibar", "Gasteiz", Month::This, 6, 2, 5.0),
        ],
    ),
    (
        "driver3@gmail.com",
        "Test driver",
        &[("Bilbo", "Donostia", Month::This, 14, 1, 3.0)],
    ),
];

impl SeedPlan {
    /// Build the sample data for the month containing `today`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rideshare_core::SeedPlan;
    ///
    /// # fn main() -> Result<(), rideshare_core::SeedError> {
    /// let today = NaiveDate::from_ymd_opt(2025, 12, 20).expect("valid date");
    /// let plan = SeedPlan::anchored_at(today)?;
    /// assert_eq!(plan.drivers.len(), 3);
    /// assert_eq!(plan.ride_count(), 9);
    /// # Ok(())
    /// # }
    /// ```
    pub fn anchored_at(today: NaiveDate) -> Result<Self, SeedError> {
        let this_month = MonthRange::containing(today);
        let next_month = this_month.next().ok_or(SeedError::OutOfRange { today })?;

        let drivers = DRIVERS
            .iter()
            .map(|&(email, name, rows)| -> Result<SeedDriver, SeedError> {
                let driver = Driver::new(email, name)?;
                let rides = rows
                    .iter()
                    .map(|row| seed_ride(row, this_month, next_month, today))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SeedDriver { driver, rides })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { drivers })
    }

    /// Total number of rides across all drivers.
    #[must_use]
    pub fn ride_count(&self) -> usize {
        self.drivers.iter().map(|entry| entry.rides.len()).sum()
    }
}

fn seed_ride(
    &(origin, destination, month, day, seats, price): &RideRow,
    this_month: MonthRange,
    next_month: MonthRange,
    today: NaiveDate,
) -> Result<NewRide, SeedError> {
    let range = match month {
        Month::This => this_month,
        Month::Next => next_month,
    };
    let date = range.day(day).ok_or(SeedError::OutOfRange { today })?;
    Ok(NewRide::new(origin, destination, date, seats, price)?)
}
