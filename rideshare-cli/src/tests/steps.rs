//! Behaviour-driven step definitions driving the rideshare CLI scenarios.

use super::helpers::StoreDir;
use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Scenario state: one scratch store and the outcome of the last command.
struct CommandWorld {
    store: StoreDir,
    outcome: RefCell<Option<Result<String, CliError>>>,
}

impl CommandWorld {
    fn new() -> Self {
        Self {
            store: StoreDir::new(),
            outcome: RefCell::new(None),
        }
    }

    fn run(&self, args: &[&str]) {
        self.outcome.replace(Some(self.store.run(args)));
    }

    fn output(&self) -> String {
        let borrowed = self.outcome.borrow();
        match borrowed.as_ref().expect("command recorded") {
            Ok(out) => out.clone(),
            Err(err) => panic!("expected the command to succeed, found {err:?}"),
        }
    }

    fn error_message(&self) -> String {
        let borrowed = self.outcome.borrow();
        match borrowed.as_ref().expect("command recorded") {
            Ok(out) => panic!("expected the command to fail, found output {out:?}"),
            Err(err) => err.to_string(),
        }
    }
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::new()
}

#[given("an initialised ride store")]
fn initialised_store(#[from(world)] world: &CommandWorld) {
    world.run(&["init"]);
    assert!(world.output().starts_with("initialised ride store"));
}

#[given("no ride store has been initialised")]
fn no_store(#[from(world)] world: &CommandWorld) {
    assert!(!world.store.database().exists());
}

#[when("I list departure cities")]
fn list_departures(#[from(world)] world: &CommandWorld) {
    world.run(&["departures"]);
}

#[when("the test driver publishes a ride from Gasteiz to Eibar on 2030-01-20")]
fn publish_ride(#[from(world)] world: &CommandWorld) {
    world.run(&[
        "create-ride",
        "--driver",
        "driver3@gmail.com",
        "--from",
        "Gasteiz",
        "--to",
        "Eibar",
        "--date",
        "2030-01-20",
        "--seats",
        "2",
        "--price",
        "3",
    ]);
}

#[when("the first driver publishes a ride dated today")]
fn publish_ride_today(#[from(world)] world: &CommandWorld) {
    world.run(&[
        "create-ride",
        "--driver",
        "driver1@gmail.com",
        "--from",
        "Donostia",
        "--to",
        "Zarautz",
        "--date",
        "2030-01-02",
        "--seats",
        "2",
        "--price",
        "3",
    ]);
}

#[then("the output lists Bilbo, Donostia and Eibar")]
fn lists_seeded_departures(#[from(world)] world: &CommandWorld) {
    assert_eq!(world.output(), "Bilbo\nDonostia\nEibar\n");
}

#[then("one ride from Gasteiz to Eibar is listed on 2030-01-20")]
fn lists_published_ride(#[from(world)] world: &CommandWorld) {
    assert!(world.output().contains("Gasteiz -> Eibar on 2030-01-20"));
    world.run(&[
        "rides", "--date", "2030-01-20", "--from", "Gasteiz", "--to", "Eibar", "--json",
    ]);
    let decoded: serde_json::Value =
        serde_json::from_str(&world.output()).expect("valid json");
    let rides = decoded.as_array().expect("json array");
    assert_eq!(rides.len(), 1);
    assert_eq!(rides[0]["driver_email"], "driver3@gmail.com");
}

#[then("the command fails with \"The ride must be later than today\"")]
fn fails_with_late_date_message(#[from(world)] world: &CommandWorld) {
    let message = world.error_message();
    assert!(
        message.starts_with("The ride must be later than today"),
        "unexpected message {message}"
    );
}

#[then("the command asks for the store to be initialised")]
fn asks_for_init(#[from(world)] world: &CommandWorld) {
    assert!(world.error_message().contains("run `rideshare init` first"));
}

macro_rules! register_command_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/rideshare_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

register_command_scenario!(browsing_initialised_store, "browsing an initialised store");
register_command_scenario!(
    publishing_from_command_line,
    "publishing a ride from the command line"
);
register_command_scenario!(rejecting_ride_dated_today, "rejecting a ride dated today");
register_command_scenario!(querying_before_init, "querying before initialisation");
