//! Rides offered by drivers.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::RideStoreError;

/// Identifier the store assigns to a persisted ride.
pub type RideNumber = u64;

/// A ride that has not been persisted yet.
///
/// Construction checks the fields that do not depend on the current time. The
/// departure date is checked against the clock when the ride is created in a
/// store.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rideshare_core::NewRide;
///
/// # fn main() -> Result<(), rideshare_core::RideError> {
/// let date = NaiveDate::from_ymd_opt(2030, 5, 15).expect("valid date");
/// let ride = NewRide::new("Donostia", "Bilbo", date, 4, 7.0)?;
/// assert_eq!(ride.origin, "Donostia");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewRide {
    /// City the ride departs from.
    pub origin: String,
    /// City the ride arrives at.
    pub destination: String,
    /// Calendar day of the ride.
    pub date: NaiveDate,
    /// Seats offered to passengers.
    pub seats: u32,
    /// Price per seat.
    pub price: f64,
}

/// Errors returned by [`NewRide::new`].
#[derive(Debug, Error, PartialEq)]
pub enum RideError {
    /// The origin or destination was blank.
    #[error("ride {field} must not be blank")]
    BlankCity {
        /// Which city field was blank.
        field: &'static str,
    },
    /// The price was negative or not a finite number.
    #[error("ride price must be a finite, non-negative number (got {price})")]
    InvalidPrice {
        /// Rejected price.
        price: f64,
    },
}

impl NewRide {
    /// Validates and constructs a [`NewRide`]. City names are trimmed.
    pub fn new(
        origin: impl AsRef<str>,
        destination: impl AsRef<str>,
        date: NaiveDate,
        seats: u32,
        price: f64,
    ) -> Result<Self, RideError> {
        let origin = non_blank(origin.as_ref(), "origin")?;
        let destination = non_blank(destination.as_ref(), "destination")?;
        if !price.is_finite() || price < 0.0 {
            return Err(RideError::InvalidPrice { price });
        }
        Ok(Self {
            origin,
            destination,
            date,
            seats,
            price,
        })
    }

    /// Whether this ride covers the same route on the same day as `ride`.
    #[must_use]
    pub fn same_trip_as(&self, ride: &Ride) -> bool {
        self.origin == ride.origin && self.destination == ride.destination && self.date == ride.date
    }

    /// Attach the store-assigned number and owner.
    #[must_use]
    pub fn into_ride(self, number: RideNumber, driver_email: impl Into<String>) -> Ride {
        Ride {
            number,
            driver_email: driver_email.into(),
            origin: self.origin,
            destination: self.destination,
            date: self.date,
            seats: self.seats,
            price: self.price,
        }
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String, RideError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(RideError::BlankCity { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

/// A persisted ride.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ride {
    /// Store-assigned identifier.
    pub number: RideNumber,
    /// Email of the owning driver.
    pub driver_email: String,
    /// City the ride departs from.
    pub origin: String,
    /// City the ride arrives at.
    pub destination: String,
    /// Calendar day of the ride.
    pub date: NaiveDate,
    /// Seats offered to passengers.
    pub seats: u32,
    /// Price per seat.
    pub price: f64,
}

/// Reject rides whose date does not start strictly after `now`.
///
/// A date stands for midnight at the start of that day, so any ride dated
/// today or earlier is rejected once the day has begun.
pub fn ensure_departs_after(date: NaiveDate, now: NaiveDateTime) -> Result<(), RideStoreError> {
    if NaiveDateTime::new(date, NaiveTime::MIN) > now {
        Ok(())
    } else {
        Err(RideStoreError::InvalidRideDate { date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 3, 10).expect("valid date")
    }

    fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, 0, 0).expect("valid time")
    }

    #[rstest]
    #[case("", "Bilbo", "origin")]
    #[case("Donostia", "   ", "destination")]
    fn rejects_blank_cities(
        date: NaiveDate,
        #[case] origin: &str,
        #[case] destination: &str,
        #[case] field: &'static str,
    ) {
        let result = NewRide::new(origin, destination, date, 1, 1.0);
        assert_eq!(result, Err(RideError::BlankCity { field }));
    }

    #[rstest]
    #[case(-0.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_price(date: NaiveDate, #[case] price: f64) {
        let result = NewRide::new("Donostia", "Bilbo", date, 1, price);
        assert!(matches!(result, Err(RideError::InvalidPrice { .. })));
    }

    #[rstest]
    fn accepts_free_rides_with_no_seats(date: NaiveDate) {
        let ride = NewRide::new("Donostia", "Bilbo", date, 0, 0.0).expect("valid ride");
        assert_eq!(ride.seats, 0);
    }

    #[rstest]
    fn departure_must_be_after_now(date: NaiveDate) {
        let previous_day = date.pred_opt().expect("previous day");
        assert!(ensure_departs_after(date, at(previous_day, 23)).is_ok());
        assert!(matches!(
            ensure_departs_after(date, at(date, 9)),
            Err(RideStoreError::InvalidRideDate { .. })
        ));
        assert!(ensure_departs_after(previous_day, at(date, 9)).is_err());
    }

    #[rstest]
    fn departure_at_exact_midnight_is_not_later(date: NaiveDate) {
        assert!(ensure_departs_after(date, at(date, 0)).is_err());
    }

    #[rstest]
    fn same_trip_ignores_seats_and_price(date: NaiveDate) {
        let draft = NewRide::new("Donostia", "Bilbo", date, 4, 7.0).expect("valid ride");
        let mut stored = draft.clone().into_ride(1, "driver1@gmail.com");
        stored.seats = 1;
        stored.price = 3.0;
        assert!(draft.same_trip_as(&stored));
        stored.destination = "Gasteiz".into();
        assert!(!draft.same_trip_as(&stored));
    }
}
