//! Core domain types and data access for the rideshare application.
//!
//! Drivers publish rides between cities on a calendar date. A [`RideStore`]
//! persists them and answers the queries a front end needs to let travellers
//! browse rides: departure cities, reachable destinations, and the days of a
//! month on which a route is served. [`RideService`] wraps a store so several
//! screens can share it.
//!
//! Constructors return `Result` to surface invalid input early; store
//! operations report failures through [`RideStoreError`].

#![forbid(unsafe_code)]

use std::sync::Arc;

mod calendar;
mod config;
mod driver;
mod error;
mod facade;
mod messages;
mod ride;
mod seed;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use calendar::MonthRange;
pub use config::{Credentials, StoreConfig, StoreLocation};
pub use driver::{Driver, DriverError};
pub use error::{BackendError, RideStoreError};
pub use facade::{RideFacade, RideService};
pub use messages::MessageKey;
pub use mockable::{Clock, DefaultClock};
pub use ride::{NewRide, Ride, RideError, RideNumber, ensure_departs_after};
pub use seed::{SeedDriver, SeedError, SeedPlan};
pub use store::RideStore;
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteRideStore, StoreConnectionError};

/// Clock shared between a store and the code that drives it.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;
