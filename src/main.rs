use anyhow::Context;
use clap::Parser;
use console::style;
use dealias::config::Cli;
use dealias::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {:#}", style("error").red().bold().for_stderr(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli).context("invalid arguments")?;

    dealias::commands::copy::run(config)?;
    Ok(())
}
