//! Layered ride store options shared by every subcommand.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rideshare_core::{Credentials, StoreConfig, StoreLocation};
use serde::{Deserialize, Serialize};

use crate::CliError;

pub(crate) const ARG_MODE: &str = "mode";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_HOST: &str = "host";
pub(crate) const ARG_PORT: &str = "port";
pub(crate) const ARG_REMOTE_DATABASE: &str = "remote-database";
pub(crate) const ARG_USER: &str = "user";
pub(crate) const ARG_PASSWORD: &str = "password";
pub(crate) const ENV_HOST: &str = "RIDESHARE_CMDS_STORE_HOST";
pub(crate) const ENV_PORT: &str = "RIDESHARE_CMDS_STORE_PORT";
pub(crate) const ENV_REMOTE_DATABASE: &str = "RIDESHARE_CMDS_STORE_REMOTE_DATABASE";
pub(crate) const ENV_USER: &str = "RIDESHARE_CMDS_STORE_USER";

/// Database file used when no path is configured.
pub(crate) const DEFAULT_DATABASE: &str = "rides.db";

/// Kind of store to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum StoreMode {
    /// A database file on local disk.
    #[default]
    Local,
    /// A database server.
    Remote,
    /// A throwaway database held in memory.
    Memory,
}

/// Ride store options, layered from CLI flags, config files and environment.
///
/// Files use a `[cmds.store]` table and environment variables use the
/// `RIDESHARE_CMDS_STORE_` prefix.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "store", next_help_heading = "Store options")]
#[ortho_config(prefix = "RIDESHARE")]
pub(crate) struct StoreArgs {
    /// Kind of store to open.
    #[arg(long = ARG_MODE, value_enum, value_name = "mode")]
    #[serde(default)]
    pub(crate) mode: Option<StoreMode>,
    /// Path to the local database file (defaults to `rides.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Host of a remote store.
    #[arg(long = ARG_HOST, value_name = "host")]
    #[serde(default)]
    pub(crate) host: Option<String>,
    /// Port of a remote store.
    #[arg(long = ARG_PORT, value_name = "port")]
    #[serde(default)]
    pub(crate) port: Option<u16>,
    /// Database name on a remote store.
    #[arg(long = ARG_REMOTE_DATABASE, value_name = "name")]
    #[serde(default)]
    pub(crate) remote_database: Option<String>,
    /// User name for a remote store.
    #[arg(long = ARG_USER, value_name = "user")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Password for a remote store.
    #[arg(long = ARG_PASSWORD, value_name = "password")]
    #[serde(default)]
    pub(crate) password: Option<String>,
}

impl StoreArgs {
    pub(crate) fn into_config(self) -> Result<StoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        StoreConfig::try_from(merged)
    }
}

impl TryFrom<StoreArgs> for StoreConfig {
    type Error = CliError;

    fn try_from(args: StoreArgs) -> Result<Self, Self::Error> {
        match args.mode.unwrap_or_default() {
            StoreMode::Local => Ok(Self::local(
                args.database
                    .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            )),
            StoreMode::Memory => Ok(Self::in_memory()),
            StoreMode::Remote => remote_config(args),
        }
    }
}

fn remote_config(args: StoreArgs) -> Result<StoreConfig, CliError> {
    let host = args.host.ok_or(CliError::MissingArgument {
        field: ARG_HOST,
        env: ENV_HOST,
    })?;
    let port = args.port.ok_or(CliError::MissingArgument {
        field: ARG_PORT,
        env: ENV_PORT,
    })?;
    let database = args.remote_database.ok_or(CliError::MissingArgument {
        field: ARG_REMOTE_DATABASE,
        env: ENV_REMOTE_DATABASE,
    })?;
    let user = args.user.ok_or(CliError::MissingArgument {
        field: ARG_USER,
        env: ENV_USER,
    })?;
    Ok(StoreConfig {
        location: StoreLocation::Remote {
            host,
            port,
            database,
            credentials: Credentials {
                user,
                password: args.password.unwrap_or_default(),
            },
        },
        reset_existing: false,
    })
}

/// Fail unless a local database already exists at `path`.
///
/// Commands other than `init` must not silently create an empty store.
pub(crate) fn require_existing_store(config: &StoreConfig) -> Result<(), CliError> {
    let StoreLocation::Local { path } = &config.location else {
        return Ok(());
    };
    require_existing(path)
}

fn require_existing(path: &Utf8Path) -> Result<(), CliError> {
    match rideshare_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingStoreFile {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectStorePath {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<StoreConfig, CliError> {
    let merged = StoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    StoreConfig::try_from(merged)
}
