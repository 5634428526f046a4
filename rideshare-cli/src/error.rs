//! Error types emitted by the rideshare CLI.
//!
//! Keep this error type reasonably small, as every command handler returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rideshare_core::{RideError, RideStoreError};
use thiserror::Error;

/// Errors emitted by the rideshare CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Only one end of a route was given.
    #[error("--{given} requires --{missing}")]
    IncompleteRoute {
        given: &'static str,
        missing: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// The local database has not been created yet.
    #[error("ride store {path:?} does not exist; run `rideshare init` first")]
    MissingStoreFile { path: Utf8PathBuf },
    /// The local database path could not be inspected.
    #[error("failed to inspect ride store path {path:?}: {source}")]
    InspectStorePath {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening or closing the ride store failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    StoreConnection(#[from] rideshare_core::StoreConnectionError),
    /// The ride request was malformed.
    #[error(transparent)]
    InvalidRide(#[from] RideError),
    /// The ride store rejected or failed the request.
    #[error("{}: {source}", .source.message_key().default_text())]
    Store {
        #[from]
        source: RideStoreError,
    },
    /// Installing the logger failed.
    #[error("failed to initialise logging: {0}")]
    InitLogging(#[from] log::SetLoggerError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
