//! rebundle - change a macOS app's bundle identifier and re-sign it
//!
//! Rewrites `CFBundleIdentifier` in an app's Info.plist, then clears extended attributes and
//! applies an ad-hoc code signature. Apps in protected system locations are staged in a
//! writable scratch directory for signing and moved back with administrator rights.

use std::process::ExitCode;

use clap::Parser;

mod bundle;
mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod privilege;
mod process;
mod relocate;
mod resign;
mod ui;
mod workflow;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        commands::completions::run(shell);
        return ExitCode::SUCCESS;
    }

    logging::init(cli.verbose);
    commands::run::run(cli.into())
}
