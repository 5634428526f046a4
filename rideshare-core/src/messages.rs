//! Message keys for user-facing text.
//!
//! Front ends resolve keys against their own localised bundles. The
//! [`MessageKey::default_text`] catalogue supplies English fallbacks.

use std::fmt;

/// Identifier of a piece of user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Title of the main menu screen.
    MainTitle,
    /// Title of the ride query screen.
    QueryRides,
    /// Title of the create-ride screen.
    CreateRide,
    /// A ride was requested for today or an earlier date.
    RideMustBeLaterThanToday,
    /// The driver already offers the same route on the same date.
    RideAlreadyExists,
    /// No driver is registered under the supplied email.
    DriverNotFound,
    /// A driver with the same email is already registered.
    DriverAlreadyExists,
    /// The ride store could not complete the request.
    StoreUnavailable,
}

impl MessageKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::MainTitle,
        Self::QueryRides,
        Self::CreateRide,
        Self::RideMustBeLaterThanToday,
        Self::RideAlreadyExists,
        Self::DriverNotFound,
        Self::DriverAlreadyExists,
        Self::StoreUnavailable,
    ];

    /// Bundle key used to look the text up.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainTitle => "MainTitle",
            Self::QueryRides => "QueryRides",
            Self::CreateRide => "CreateRide",
            Self::RideMustBeLaterThanToday => "CreateRideGUI.ErrorRideMustBeLaterThanToday",
            Self::RideAlreadyExists => "DataAccess.RideAlreadyExist",
            Self::DriverNotFound => "DataAccess.DriverNotFound",
            Self::DriverAlreadyExists => "DataAccess.DriverAlreadyExist",
            Self::StoreUnavailable => "DataAccess.StoreUnavailable",
        }
    }

    /// English text for the key.
    #[must_use]
    pub const fn default_text(self) -> &'static str {
        match self {
            Self::MainTitle => "Rideshare",
            Self::QueryRides => "Query rides",
            Self::CreateRide => "Create ride",
            Self::RideMustBeLaterThanToday => "The ride must be later than today",
            Self::RideAlreadyExists => "The ride already exists",
            Self::DriverNotFound => "No driver is registered with that email",
            Self::DriverAlreadyExists => "A driver with that email already exists",
            Self::StoreUnavailable => "The ride store is unavailable",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
