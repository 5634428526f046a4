//! Test helpers for driving the CLI against a scratch ride store.

use super::*;
use camino::Utf8PathBuf;
use rideshare_core::test_support::{FixedClock, MemoryRideStore, date};
use rideshare_core::{RideFacade, RideService, RideStore};
use tempfile::TempDir;

/// The day every CLI test treats as today.
pub(super) fn today() -> NaiveDate {
    date(2030, 1, 2)
}

pub(super) fn clock() -> SharedClock {
    Arc::new(FixedClock::at_noon(today()))
}

/// Seeded in-memory facade for shell tests.
pub(super) fn seeded_facade() -> Arc<dyn RideFacade> {
    let mut store = MemoryRideStore::new(clock());
    store.seed_initial_data();
    Arc::new(RideService::new(store))
}

/// A temporary directory holding the database passed to every command.
pub(super) struct StoreDir {
    _dir: TempDir,
    database: Utf8PathBuf,
}

impl StoreDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            database: root.join("data").join("rides.db"),
            _dir: dir,
        }
    }

    /// A directory on which `init` has already run.
    pub(super) fn initialised() -> Self {
        let store = Self::new();
        store.run(&["init"]).expect("init succeeds");
        store
    }

    pub(super) fn database(&self) -> &Utf8PathBuf {
        &self.database
    }

    /// Run `rideshare <args> --database <db>` and capture stdout.
    pub(super) fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let invocation = std::iter::once("rideshare")
            .chain(args.iter().copied())
            .chain(["--database", self.database.as_str()]);
        let cli = Cli::try_parse_from(invocation)?;
        let mut out = Vec::new();
        run_with(cli, clock(), &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }
}
