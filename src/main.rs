use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use sentry_release::{Outcome, cli};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("sentry_release")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    let outcome = match cli::execute(&cli_args) {
        Ok(outcome) => outcome,
        Err(err) if err.is_execution_failure() => {
            return Err(err).wrap_err(
                "release aborted: an external command failed",
            );
        }
        Err(err) => return Err(err.into()),
    };

    // gated and invalid runs are not failures
    match outcome {
        Outcome::Published { release, .. } => {
            log::debug!("release {release} complete")
        }
        Outcome::Declined | Outcome::Disabled | Outcome::Invalid(_) => {}
    }

    Ok(())
}
