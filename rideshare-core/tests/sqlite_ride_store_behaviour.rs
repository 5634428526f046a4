//! Behavioural tests for `SqliteRideStore` using rstest-bdd.

use std::{cell::RefCell, sync::Arc};

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use rideshare_core::{
    Credentials, Driver, NewRide, RideStore, RideStoreError, SharedClock, SqliteRideStore,
    StoreConfig, StoreConnectionError, StoreLocation,
    test_support::{FixedClock, date},
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const DRIVER: &str = "driver1@gmail.com";

/// Shared state for ride store scenarios.
#[derive(Debug)]
struct RideStoreWorld {
    temp_dir: TempDir,
    store: RefCell<Option<SqliteRideStore>>,
    open_error: RefCell<Option<StoreConnectionError>>,
    ride_error: RefCell<Option<RideStoreError>>,
}

impl RideStoreWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            store: RefCell::new(None),
            open_error: RefCell::new(None),
            ride_error: RefCell::new(None),
        }
    }

    fn today() -> NaiveDate {
        date(2030, 1, 2)
    }

    fn clock() -> SharedClock {
        Arc::new(FixedClock::at_noon(Self::today()))
    }

    fn db_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.temp_dir.path().join("rides.db")).expect("utf-8 path")
    }

    fn open(&self, config: &StoreConfig) {
        match SqliteRideStore::open(config, Self::clock()) {
            Ok(store) => {
                self.store.replace(Some(store));
                self.open_error.replace(None);
            }
            Err(err) => {
                self.store.replace(None);
                self.open_error.replace(Some(err));
            }
        }
    }

    fn with_store<T>(&self, action: impl FnOnce(&mut SqliteRideStore) -> T) -> T {
        let mut borrowed = self.store.borrow_mut();
        let store = borrowed.as_mut().expect("store should be open");
        action(store)
    }

    fn publish(&self, ride: &NewRide, driver_email: &str) {
        let outcome = self.with_store(|store| store.create_ride(ride, driver_email));
        self.ride_error.replace(outcome.err());
    }

    fn take_ride_error(&self) -> RideStoreError {
        self.ride_error
            .borrow_mut()
            .take()
            .expect("a ride error should be recorded")
    }
}

#[fixture]
fn world() -> RideStoreWorld {
    RideStoreWorld::new()
}

fn mid_january_ride() -> NewRide {
    NewRide::new("Donostia", "Bilbo", date(2030, 1, 15), 4, 7.0).expect("valid ride")
}

#[given("a ride store file seeded at the start of January 2030")]
fn given_seeded_file(world: &RideStoreWorld) {
    world.open(&StoreConfig::local(world.db_path()));
    let mut store = world.store.borrow_mut().take().expect("store should be open");
    store.seed_initial_data();
    store.close().expect("close store");
}

#[given("an empty ride store")]
fn given_empty_store(world: &RideStoreWorld) {
    world.open(&StoreConfig::in_memory());
}

#[given("an empty ride store with a registered driver")]
fn given_store_with_driver(world: &RideStoreWorld) {
    given_empty_store(world);
    let driver = Driver::new(DRIVER, "Aitor Fernandez").expect("valid driver");
    world
        .with_store(|store| store.create_driver(&driver))
        .expect("create driver");
}

#[when("I reopen the ride store")]
fn reopen(world: &RideStoreWorld) {
    world.open(&StoreConfig::local(world.db_path()));
}

#[when("I reopen the ride store with reset")]
fn reopen_with_reset(world: &RideStoreWorld) {
    world.open(&StoreConfig::local(world.db_path()).resetting_existing());
}

#[when("I open a remote ride store")]
fn open_remote(world: &RideStoreWorld) {
    world.open(&StoreConfig {
        location: StoreLocation::Remote {
            host: "rides.example.com".into(),
            port: 5432,
            database: "rides".into(),
            credentials: Credentials {
                user: "rides".into(),
                password: "secret".into(),
            },
        },
        reset_existing: false,
    });
}

#[when("the driver publishes a ride from Donostia to Bilbo in mid January")]
fn publish_mid_january(world: &RideStoreWorld) {
    world.publish(&mid_january_ride(), DRIVER);
    assert!(world.ride_error.borrow().is_none(), "first ride should be stored");
}

#[when("the driver publishes the same ride again")]
fn publish_again(world: &RideStoreWorld) {
    world.publish(&mid_january_ride(), DRIVER);
}

#[when("the driver publishes a ride dated today")]
fn publish_today(world: &RideStoreWorld) {
    let ride =
        NewRide::new("Donostia", "Bilbo", RideStoreWorld::today(), 4, 7.0).expect("valid ride");
    world.publish(&ride, DRIVER);
}

#[when("an unknown driver publishes a ride")]
fn publish_unknown_driver(world: &RideStoreWorld) {
    world.publish(&mid_january_ride(), "ghost@example.com");
}

#[then("the departure cities are Bilbo, Donostia and Eibar")]
fn then_seeded_cities(world: &RideStoreWorld) {
    let cities = world
        .with_store(|store| store.list_departure_cities())
        .expect("list cities");
    assert_eq!(cities, vec!["Bilbo", "Donostia", "Eibar"]);
}

#[then("no departure cities are listed")]
fn then_no_cities(world: &RideStoreWorld) {
    let cities = world
        .with_store(|store| store.list_departure_cities())
        .expect("list cities");
    assert!(cities.is_empty(), "expected an empty store, got {cities:?}");
}

#[then("the ride store reports a duplicate ride")]
fn then_duplicate(world: &RideStoreWorld) {
    let err = world.take_ride_error();
    assert!(matches!(err, RideStoreError::DuplicateRide { .. }));
}

#[then("one ride is stored for the duplicated trip")]
fn then_single_ride(world: &RideStoreWorld) {
    let rides = world
        .with_store(|store| store.find_rides("Donostia", "Bilbo", date(2030, 1, 15)))
        .expect("find rides");
    assert_eq!(rides.len(), 1, "expected exactly one ride");
}

#[then("the ride store reports an invalid ride date")]
fn then_invalid_date(world: &RideStoreWorld) {
    let err = world.take_ride_error();
    assert!(matches!(err, RideStoreError::InvalidRideDate { .. }));
}

#[then("the ride store reports a missing driver")]
fn then_missing_driver(world: &RideStoreWorld) {
    let err = world.take_ride_error();
    assert!(matches!(err, RideStoreError::DriverNotFound { .. }));
}

#[then("opening fails because remote stores are unsupported")]
fn then_remote_rejected(world: &RideStoreWorld) {
    let binding = world.open_error.borrow();
    let error = binding.as_ref().expect("an error should be recorded");
    assert!(matches!(
        error,
        StoreConnectionError::RemoteUnsupported { port: 5432, .. }
    ));
}

#[scenario(path = "tests/features/sqlite_ride_store.feature", index = 0)]
fn seeded_rides_survive_reopening(world: RideStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_ride_store.feature", index = 1)]
fn reset_drops_rides(world: RideStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_ride_store.feature", index = 2)]
fn duplicate_trip_is_stored_once(world: RideStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_ride_store.feature", index = 3)]
fn ride_dated_today_is_rejected(world: RideStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_ride_store.feature", index = 4)]
fn unknown_driver_is_rejected(world: RideStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_ride_store.feature", index = 5)]
fn remote_location_is_rejected(world: RideStoreWorld) {
    let _ = world;
}
