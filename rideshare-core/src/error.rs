//! Errors reported by ride store operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::MessageKey;

/// Boxed backend error carried by [`RideStoreError::Storage`].
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a ride store operation.
///
/// The first four variants are validation outcomes a front end reports to the
/// user through [`RideStoreError::message_key`]. The remaining variants mean
/// the store itself misbehaved.
#[derive(Debug, Error)]
pub enum RideStoreError {
    /// The ride is dated today or earlier.
    #[error("ride on {date} must be later than today")]
    InvalidRideDate {
        /// Rejected ride date.
        date: NaiveDate,
    },
    /// The driver already offers this route on this date.
    #[error("{driver_email} already has a ride from {origin} to {destination} on {date}")]
    DuplicateRide {
        /// Owner of the existing ride.
        driver_email: String,
        /// Departure city.
        origin: String,
        /// Arrival city.
        destination: String,
        /// Ride date.
        date: NaiveDate,
    },
    /// No driver is registered under the email.
    #[error("no driver registered with email {email}")]
    DriverNotFound {
        /// Email that was looked up.
        email: String,
    },
    /// A driver with this email already exists.
    #[error("driver {email} is already registered")]
    DuplicateDriver {
        /// Conflicting email.
        email: String,
    },
    /// The backing store failed while running an operation.
    #[error("ride store failed to {operation}: {source}")]
    Storage {
        /// Step that failed.
        operation: &'static str,
        /// Underlying backend error.
        #[source]
        source: BackendError,
    },
    /// Another user of the shared store panicked while holding it.
    #[error("ride store is unavailable after an earlier failure")]
    Unavailable,
}

impl RideStoreError {
    /// Wrap a backend error raised while performing `operation`.
    #[must_use]
    pub fn storage(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            operation,
            source: Box::new(source),
        }
    }

    /// Message key for user-facing text describing the failure.
    #[must_use]
    pub const fn message_key(&self) -> MessageKey {
        match self {
            Self::InvalidRideDate { .. } => MessageKey::RideMustBeLaterThanToday,
            Self::DuplicateRide { .. } => MessageKey::RideAlreadyExists,
            Self::DriverNotFound { .. } => MessageKey::DriverNotFound,
            Self::DuplicateDriver { .. } => MessageKey::DriverAlreadyExists,
            Self::Storage { .. } | Self::Unavailable => MessageKey::StoreUnavailable,
        }
    }

    /// Whether the failure is a validation outcome the caller can act on.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage { .. } | Self::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 2).expect("valid date")
    }

    #[rstest]
    fn validation_errors_map_to_distinct_keys() {
        let errors = [
            RideStoreError::InvalidRideDate { date: date() },
            RideStoreError::DuplicateRide {
                driver_email: "a@b.c".into(),
                origin: "Donostia".into(),
                destination: "Bilbo".into(),
                date: date(),
            },
            RideStoreError::DriverNotFound {
                email: "a@b.c".into(),
            },
            RideStoreError::DuplicateDriver {
                email: "a@b.c".into(),
            },
        ];
        let keys: std::collections::HashSet<_> =
            errors.iter().map(RideStoreError::message_key).collect();
        assert_eq!(keys.len(), errors.len());
        assert!(errors.iter().all(RideStoreError::is_recoverable));
    }

    #[rstest]
    fn storage_errors_are_not_recoverable() {
        let error = RideStoreError::storage("read rides", std::io::Error::other("disk gone"));
        assert!(!error.is_recoverable());
        assert_eq!(error.message_key(), MessageKey::StoreUnavailable);
        assert!(error.to_string().contains("read rides"));
    }
}
