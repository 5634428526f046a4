//! Connection settings for a ride store.
//!
//! A [`StoreConfig`] is built once at startup (the CLI layers it from flags,
//! files and environment) and handed to the store constructor.

use std::fmt;

use camino::Utf8PathBuf;

/// Where the ride data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "kebab-case"))]
pub enum StoreLocation {
    /// An embedded database file on local disk.
    Local {
        /// Database file.
        path: Utf8PathBuf,
    },
    /// A database server reached over the network.
    Remote {
        /// Server host name.
        host: String,
        /// Server port.
        port: u16,
        /// Database name on the server.
        database: String,
        /// Login details.
        credentials: Credentials,
    },
    /// A private, process-local database discarded on close.
    InMemory,
}

/// Username and password for a remote store.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Credentials {
    /// Login name.
    pub user: String,
    /// Login secret.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings used to open a ride store.
///
/// # Examples
///
/// ```
/// use rideshare_core::{StoreConfig, StoreLocation};
///
/// let config = StoreConfig::local("rides.db").resetting_existing();
/// assert!(config.reset_existing);
/// assert!(matches!(config.location, StoreLocation::Local { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreConfig {
    /// Database location.
    pub location: StoreLocation,
    /// Drop any existing data before opening. Intended for initialisation and
    /// test runs.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reset_existing: bool,
}

impl StoreConfig {
    /// Configuration for a local database file.
    #[must_use]
    pub fn local(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            location: StoreLocation::Local { path: path.into() },
            reset_existing: false,
        }
    }

    /// Configuration for a throwaway in-memory database.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            reset_existing: false,
        }
    }

    /// The same configuration with existing data dropped on open.
    #[must_use]
    pub fn resetting_existing(mut self) -> Self {
        self.reset_existing = true;
        self
    }

    /// Human-readable description of the location, without secrets.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.location {
            StoreLocation::Local { path } => format!("local:{path}"),
            StoreLocation::Remote {
                host,
                port,
                database,
                credentials,
            } => format!("remote:{}@{host}:{port}/{database}", credentials.user),
            StoreLocation::InMemory => "memory".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn debug_output_hides_password() {
        let credentials = Credentials {
            user: "admin".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }

    #[rstest]
    #[case(StoreConfig::local("data/rides.db"), "local:data/rides.db")]
    #[case(StoreConfig::in_memory(), "memory")]
    fn describes_locations(#[case] config: StoreConfig, #[case] expected: &str) {
        assert_eq!(config.describe(), expected);
    }

    #[rstest]
    fn remote_description_omits_password() {
        let config = StoreConfig {
            location: StoreLocation::Remote {
                host: "db.example.com".into(),
                port: 6136,
                database: "rides".into(),
                credentials: Credentials {
                    user: "admin".into(),
                    password: "hunter2".into(),
                },
            },
            reset_existing: false,
        };
        assert_eq!(config.describe(), "remote:admin@db.example.com:6136/rides");
    }

    #[rstest]
    fn reset_is_off_by_default() {
        assert!(!StoreConfig::local("rides.db").reset_existing);
        assert!(StoreConfig::in_memory().resetting_existing().reset_existing);
    }
}
