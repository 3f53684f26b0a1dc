//! assetcheck - verify static asset references before deploying.
//!
//! Exit codes: `0` clean, `1` fatal configuration error, `2` broken
//! references or unused assets, `3` references missing from the manifest.

mod check;
mod cli;
mod config;
mod logger;
mod manifest;
mod reconcile;
mod report;
mod scan;

use anyhow::Result;
use check::run_check;
use clap::Parser;
use cli::{Cli, Format};
use config::Config;
use reconcile::EXIT_FATAL;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::set_verbose(cli.verbose && cli.format == Format::Text);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            report::print_error(&err, cli.format);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Load configuration, run the selected check and print its report.
fn run(cli: &Cli) -> Result<u8> {
    let config = Config::load(cli)?;
    debug!("config"; "root `{}`", config.root.display());
    if config.config_path.exists() {
        debug!("config"; "loaded `{}`", config.config_path.display());
    }

    let policy = config.policy(&cli.command);
    let outcome = run_check(&config, &policy)?;

    report::print(&outcome, cli.format, cli.command.success_message())?;
    Ok(outcome.exit_code())
}
