//! Facade crate for the rideshare data-access layer.
//!
//! This crate re-exports the core domain types and exposes the SQLite ride
//! store behind a feature flag.

#![forbid(unsafe_code)]

pub use rideshare_core::{
    Clock, Credentials, DefaultClock, Driver, DriverError, MessageKey, MonthRange, NewRide, Ride,
    RideError, RideFacade, RideNumber, RideService, RideStore, RideStoreError, SeedPlan,
    SharedClock, StoreConfig, StoreLocation,
};

#[cfg(feature = "store-sqlite")]
pub use rideshare_core::{SqliteRideStore, StoreConnectionError};

#[cfg(feature = "test-support")]
pub use rideshare_core::test_support;
