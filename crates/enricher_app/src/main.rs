mod cli;
mod terminal;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    engine_logging::initialize(cli.log_destination(), cli.log_level());
    terminal::run_app(cli)
}
