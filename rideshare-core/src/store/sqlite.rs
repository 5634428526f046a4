//! SQLite-backed ride store.

use std::{fmt, io};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use mockable::Clock;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{
    Connection, Error as SqliteError, OptionalExtension, Params, Row, Transaction, params,
};
use thiserror::Error;

use crate::{
    Driver, MonthRange, NewRide, Ride, RideStoreError, SeedPlan, SharedClock, StoreConfig,
    StoreLocation, ensure_departs_after,
};

use super::schema::{SchemaError, initialise_schema};
use super::{RideStore, local_now, log_create_ride};

const RIDE_COLUMNS: &str = "number, driver_email, origin, destination, date, seats, price";

/// Files SQLite may leave next to a database.
const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Ride date stored as its day number counted from 0001-01-01.
///
/// Integer columns keep SQL ordering and ranges in calendar order for every
/// year `NaiveDate` supports, including those before 0000 and after 9999.
struct DayNumber(NaiveDate);

impl ToSql for DayNumber {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0.num_days_from_ce())))
    }
}

impl FromSql for DayNumber {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let days = i64::column_result(value)?;
        i32::try_from(days)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(Self)
            .ok_or(FromSqlError::OutOfRange(days))
    }
}

fn date_from_row(row: &Row<'_>) -> rusqlite::Result<NaiveDate> {
    row.get::<_, DayNumber>(0).map(|day| day.0)
}

/// Error raised when opening or closing the store connection.
///
/// These failures are fatal: the application cannot run without its store.
#[derive(Debug, Error)]
pub enum StoreConnectionError {
    /// The SQLite backend only stores data locally.
    #[error("remote ride stores are not supported by the SQLite backend ({host}:{port})")]
    RemoteUnsupported {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
    },
    /// Creating the directory that holds the database failed.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Deleting the existing database during a reset failed.
    #[error("failed to drop existing ride store at {path}")]
    Reset {
        /// File that could not be removed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open ride store at {location}")]
    Open {
        /// Description of the configured location.
        location: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Enabling SQLite foreign keys failed.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating or checking the schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Closing the connection failed.
    #[error("failed to close ride store")]
    Close {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Ride store persisted in a SQLite database.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use rideshare_core::{RideStore, SqliteRideStore, StoreConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteRideStore::open(&StoreConfig::in_memory(), Arc::new(DefaultClock))?;
/// store.seed_initial_data();
/// assert!(store.list_departure_cities()?.contains(&"Donostia".to_owned()));
/// store.close()?;
/// # Ok(())
/// # }
/// ```
pub struct SqliteRideStore {
    connection: Connection,
    clock: SharedClock,
    location: String,
}

impl fmt::Debug for SqliteRideStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRideStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl SqliteRideStore {
    /// Open the store described by `config`, creating the schema if needed.
    ///
    /// When `config.reset_existing` is set, a local database file and its
    /// journal files are deleted first.
    pub fn open(config: &StoreConfig, clock: SharedClock) -> Result<Self, StoreConnectionError> {
        let location = config.describe();
        info!(
            "opening ride store at {location} (reset existing: {})",
            config.reset_existing
        );

        let mut connection = match &config.location {
            StoreLocation::Local { path } => open_local(path, config.reset_existing)?,
            StoreLocation::InMemory => Connection::open_in_memory().map_err(|source| {
                StoreConnectionError::Open {
                    location: location.clone(),
                    source,
                }
            })?,
            StoreLocation::Remote { host, port, .. } => {
                return Err(StoreConnectionError::RemoteUnsupported {
                    host: host.clone(),
                    port: *port,
                });
            }
        };

        connection
            .pragma_update(None, "foreign_keys", true)
            .map_err(|source| StoreConnectionError::ForeignKeys { source })?;
        initialise_schema(&mut connection)?;

        Ok(Self {
            connection,
            clock,
            location,
        })
    }

    /// Close the connection, reporting any error SQLite raises while doing so.
    pub fn close(self) -> Result<(), StoreConnectionError> {
        let location = self.location;
        self.connection
            .close()
            .map_err(|(_, source)| StoreConnectionError::Close { source })?;
        info!("ride store at {location} is closed");
        Ok(())
    }

    fn query_list<T, P, F>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Vec<T>, RideStoreError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        debug!("ride store query: {operation}");
        let mut statement = self
            .connection
            .prepare_cached(sql)
            .map_err(|source| RideStoreError::storage(operation, source))?;
        let rows = statement
            .query_map(params, map)
            .map_err(|source| RideStoreError::storage(operation, source))?;
        let values: Result<Vec<T>, _> = rows.collect();
        values.map_err(|source| RideStoreError::storage(operation, source))
    }

    fn query_rides<P: Params>(
        &self,
        operation: &'static str,
        filter: &str,
        params: P,
    ) -> Result<Vec<Ride>, RideStoreError> {
        let sql = format!("SELECT {RIDE_COLUMNS} FROM rides WHERE {filter}");
        self.query_list(operation, &sql, params, ride_from_row)
    }
}

fn open_local(path: &Utf8Path, reset_existing: bool) -> Result<Connection, StoreConnectionError> {
    rideshare_fs::ensure_parent_dir(path).map_err(|source| {
        StoreConnectionError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if reset_existing {
        drop_existing(path)?;
    }

    Connection::open(path.as_std_path()).map_err(|source| StoreConnectionError::Open {
        location: path.to_string(),
        source,
    })
}

fn drop_existing(path: &Utf8Path) -> Result<(), StoreConnectionError> {
    let sidecars = SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| Utf8PathBuf::from(format!("{path}{suffix}")));
    for file in std::iter::once(path.to_path_buf()).chain(sidecars) {
        let removed = rideshare_fs::remove_file_if_exists(&file).map_err(|source| {
            StoreConnectionError::Reset {
                path: file.clone(),
                source,
            }
        })?;
        if removed {
            info!("deleted {file}");
        }
    }
    Ok(())
}

fn ride_from_row(row: &Row<'_>) -> rusqlite::Result<Ride> {
    Ok(Ride {
        number: row.get(0)?,
        driver_email: row.get(1)?,
        origin: row.get(2)?,
        destination: row.get(3)?,
        date: row.get::<_, DayNumber>(4)?.0,
        seats: row.get(5)?,
        price: row.get(6)?,
    })
}

fn driver_exists(connection: &Connection, email: &str) -> Result<bool, RideStoreError> {
    connection
        .prepare_cached("SELECT 1 FROM drivers WHERE email = ?1 LIMIT 1")
        .and_then(|mut statement| statement.exists([email]))
        .map_err(|source| RideStoreError::storage("look up driver", source))
}

fn trip_exists(
    connection: &Connection,
    driver_email: &str,
    ride: &NewRide,
) -> Result<bool, RideStoreError> {
    connection
        .prepare_cached(
            "SELECT 1 FROM rides
             WHERE driver_email = ?1 AND origin = ?2 AND destination = ?3 AND date = ?4
             LIMIT 1",
        )
        .and_then(|mut statement| {
            statement.exists(params![
                driver_email,
                ride.origin,
                ride.destination,
                DayNumber(ride.date)
            ])
        })
        .map_err(|source| RideStoreError::storage("look up existing ride", source))
}

fn insert_driver(transaction: &Transaction<'_>, driver: &Driver) -> Result<(), RideStoreError> {
    if driver_exists(transaction, &driver.email)? {
        return Err(RideStoreError::DuplicateDriver {
            email: driver.email.clone(),
        });
    }
    transaction
        .prepare_cached("INSERT INTO drivers (email, name) VALUES (?1, ?2)")
        .and_then(|mut statement| statement.execute(params![driver.email, driver.name]))
        .map(|_| ())
        .map_err(|source| RideStoreError::storage("insert driver", source))
}

fn insert_ride(
    transaction: &Transaction<'_>,
    ride: &NewRide,
    driver_email: &str,
) -> Result<Ride, RideStoreError> {
    transaction
        .prepare_cached(
            "INSERT INTO rides (driver_email, origin, destination, date, seats, price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .and_then(|mut statement| {
            statement.execute(params![
                driver_email,
                ride.origin,
                ride.destination,
                DayNumber(ride.date),
                ride.seats,
                ride.price
            ])
        })
        .map_err(|source| RideStoreError::storage("insert ride", source))?;
    let number = u64::try_from(transaction.last_insert_rowid())
        .map_err(|source| RideStoreError::storage("read ride number", source))?;
    Ok(ride.clone().into_ride(number, driver_email))
}

fn begin(connection: &mut Connection) -> Result<Transaction<'_>, RideStoreError> {
    connection
        .transaction()
        .map_err(|source| RideStoreError::storage("begin transaction", source))
}

fn commit(transaction: Transaction<'_>) -> Result<(), RideStoreError> {
    transaction
        .commit()
        .map_err(|source| RideStoreError::storage("commit transaction", source))
}

impl RideStore for SqliteRideStore {
    fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    fn create_driver(&mut self, driver: &Driver) -> Result<(), RideStoreError> {
        info!("create driver: email={}", driver.email);
        let transaction = begin(&mut self.connection)?;
        insert_driver(&transaction, driver)?;
        commit(transaction)
    }

    fn find_driver(&self, email: &str) -> Result<Option<Driver>, RideStoreError> {
        self.connection
            .prepare_cached("SELECT email, name FROM drivers WHERE email = ?1")
            .and_then(|mut statement| {
                statement
                    .query_row([email], |row| {
                        Ok(Driver {
                            email: row.get(0)?,
                            name: row.get(1)?,
                        })
                    })
                    .optional()
            })
            .map_err(|source| RideStoreError::storage("find driver", source))
    }

    fn create_ride(&mut self, ride: &NewRide, driver_email: &str) -> Result<Ride, RideStoreError> {
        log_create_ride(ride, driver_email);
        ensure_departs_after(ride.date, local_now(self.clock()))?;

        let transaction = begin(&mut self.connection)?;
        if !driver_exists(&transaction, driver_email)? {
            return Err(RideStoreError::DriverNotFound {
                email: driver_email.to_owned(),
            });
        }
        if trip_exists(&transaction, driver_email, ride)? {
            commit(transaction)?;
            return Err(RideStoreError::DuplicateRide {
                driver_email: driver_email.to_owned(),
                origin: ride.origin.clone(),
                destination: ride.destination.clone(),
                date: ride.date,
            });
        }
        let created = insert_ride(&transaction, ride, driver_email)?;
        commit(transaction)?;
        Ok(created)
    }

    fn find_rides_by_date(&self, date: NaiveDate) -> Result<Vec<Ride>, RideStoreError> {
        self.query_rides(
            "find rides by date",
            "date = ?1 ORDER BY number",
            [DayNumber(date)],
        )
    }

    fn find_rides(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ride>, RideStoreError> {
        self.query_rides(
            "find rides on route",
            "origin = ?1 AND destination = ?2 AND date = ?3 ORDER BY number",
            params![origin, destination, DayNumber(date)],
        )
    }

    fn rides_by_driver(&self, email: &str) -> Result<Vec<Ride>, RideStoreError> {
        self.query_rides(
            "find rides by driver",
            "driver_email = ?1 ORDER BY date, number",
            [email],
        )
    }

    fn list_departure_cities(&self) -> Result<Vec<String>, RideStoreError> {
        self.query_list(
            "list departure cities",
            "SELECT DISTINCT origin FROM rides ORDER BY origin",
            [],
            |row| row.get(0),
        )
    }

    fn list_arrival_cities(&self, origin: &str) -> Result<Vec<String>, RideStoreError> {
        self.query_list(
            "list arrival cities",
            "SELECT DISTINCT destination FROM rides WHERE origin = ?1 ORDER BY destination",
            [origin],
            |row| row.get(0),
        )
    }

    fn list_ride_dates_in_month(
        &self,
        origin: &str,
        destination: &str,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        let month = MonthRange::containing(reference);
        self.query_list(
            "list ride dates in month",
            "SELECT DISTINCT date FROM rides
             WHERE origin = ?1 AND destination = ?2 AND date BETWEEN ?3 AND ?4
             ORDER BY date",
            params![
                origin,
                destination,
                DayNumber(month.first()),
                DayNumber(month.last())
            ],
            date_from_row,
        )
    }

    fn list_ride_dates(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        self.query_list(
            "list ride dates",
            "SELECT DISTINCT date FROM rides WHERE origin = ?1 AND destination = ?2 ORDER BY date",
            [origin, destination],
            date_from_row,
        )
    }

    fn list_event_dates_in_month(
        &self,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, RideStoreError> {
        let month = MonthRange::containing(reference);
        self.query_list(
            "list event dates in month",
            "SELECT DISTINCT date FROM rides WHERE date BETWEEN ?1 AND ?2 ORDER BY date",
            [DayNumber(month.first()), DayNumber(month.last())],
            date_from_row,
        )
    }

    fn persist_seed(&mut self, plan: &SeedPlan) -> Result<(), RideStoreError> {
        let transaction = begin(&mut self.connection)?;
        for entry in &plan.drivers {
            insert_driver(&transaction, &entry.driver)?;
            for ride in &entry.rides {
                insert_ride(&transaction, ride, &entry.driver.email)?;
            }
        }
        commit(transaction)
    }
}
