//! SQLite tables backing [`super::SqliteRideStore`].

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version of the ride schema created by [`initialise_schema`].
pub const SCHEMA_VERSION: i64 = 2;

/// Errors raised when creating or checking the ride schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A migration statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Step that failed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was created by a different schema version.
    #[error(
        "expected ride schema version {expected} but found {found}; reset the store or migrate it first"
    )]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}

/// Create the driver and ride tables if they are missing.
///
/// Existing databases must already carry [`SCHEMA_VERSION`].
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use rideshare_core::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create ride schema");
/// let rides: i64 = conn
///     .query_row("SELECT COUNT(*) FROM rides", [], |row| row.get(0))
///     .expect("count rides");
/// assert_eq!(rides, 0);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create drivers",
        "CREATE TABLE IF NOT EXISTS drivers (
            email TEXT PRIMARY KEY CHECK (length(trim(email)) > 0),
            name TEXT NOT NULL
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create rides",
        "CREATE TABLE IF NOT EXISTS rides (
            number INTEGER PRIMARY KEY AUTOINCREMENT,
            driver_email TEXT NOT NULL,
            origin TEXT NOT NULL,
            destination TEXT NOT NULL,
            date INTEGER NOT NULL,
            seats INTEGER NOT NULL CHECK (seats >= 0),
            price REAL NOT NULL CHECK (price >= 0),
            FOREIGN KEY (driver_email) REFERENCES drivers(email) ON DELETE CASCADE
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index rides by route",
        "CREATE INDEX IF NOT EXISTS idx_rides_route_date
            ON rides(origin, destination, date)",
    )?;
    run_migration_step(
        transaction,
        "index rides by date",
        "CREATE INDEX IF NOT EXISTS idx_rides_date ON rides(date)",
    )?;
    run_migration_step(
        transaction,
        "index rides by driver",
        "CREATE INDEX IF NOT EXISTS idx_rides_driver
            ON rides(driver_email, origin, destination, date)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS ride_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row("SELECT version FROM ride_schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO ride_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}
