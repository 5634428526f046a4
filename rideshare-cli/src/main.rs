//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use rideshare_cli::CliError;

fn main() {
    match rideshare_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("rideshare: {err}");
            std::process::exit(1);
        }
    }
}
