//! Text and JSON rendering of command results.

use std::io::Write;

use chrono::NaiveDate;
use rideshare_core::Ride;
use serde::Serialize;

use crate::CliError;

/// Result of one subcommand, ready to print.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum Report {
    Initialised {
        location: String,
        departures: Vec<String>,
    },
    Ride(Ride),
    Rides(Vec<Ride>),
    Cities(Vec<String>),
    Dates(Vec<NaiveDate>),
    Screen {
        screen: String,
    },
}

pub(crate) fn write_report(
    writer: &mut dyn Write,
    report: &Report,
    json: bool,
) -> Result<(), CliError> {
    let payload = if json {
        let mut encoded =
            serde_json::to_string_pretty(report).map_err(CliError::SerialiseOutput)?;
        encoded.push('\n');
        encoded
    } else {
        render_text(report)
    };
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)
}

fn render_text(report: &Report) -> String {
    match report {
        Report::Initialised {
            location,
            departures,
        } => format!(
            "initialised ride store at {location}\ndeparture cities: {}\n",
            departures.join(", ")
        ),
        Report::Ride(ride) => format!("{}\n", describe_ride(ride)),
        Report::Rides(rides) if rides.is_empty() => "no rides found\n".to_owned(),
        Report::Rides(rides) => lines(rides.iter().map(describe_ride)),
        Report::Cities(cities) => lines(cities.iter().cloned()),
        Report::Dates(dates) => lines(dates.iter().map(ToString::to_string)),
        Report::Screen { screen } => screen.clone(),
    }
}

fn describe_ride(ride: &Ride) -> String {
    format!(
        "#{} {} -> {} on {}: {} seats at {:.2} ({})",
        ride.number, ride.origin, ride.destination, ride.date, ride.seats, ride.price,
        ride.driver_email
    )
}

fn lines(items: impl Iterator<Item = String>) -> String {
    items.map(|item| item + "\n").collect()
}
