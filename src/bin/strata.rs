//! Strata CLI Binary
//!
//! Command-line interface for the strata filesystem tree engine.

use clap::Parser;
use strata::logging::init_logging;
use strata::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.snapshot.clone(), cli.config.clone()) {
        Ok(ctx) => ctx.with_auth_level(cli.auth_level),
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&cli.logging_config(&context.config().logging))) {
        eprintln!("Warning: logging not initialized: {}", e);
    }

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
