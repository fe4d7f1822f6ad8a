mod app;
mod catalog;
mod cli;
mod config;
mod db;
mod http;
mod logging;
mod paths;
mod store;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;

use crate::cli::Command;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let _log_guard = if Command::is_tui(cli.command.as_ref()) {
        Some(logging::init_file(
            cli.verbose,
            cli.quiet,
            &paths::log_file_path()?,
        )?)
    } else {
        logging::init_stderr(cli.verbose, cli.quiet);
        None
    };

    app::run(cli)
}
