mod config;
mod display;
mod error;
mod poller;
mod schedule;
mod trust;
mod version;

use crate::{
    config::{Cli, Config},
    error::ConfigError,
    poller::Poller,
    trust::TrustRoots,
};
use clap::{CommandFactory, Parser};
use miette::IntoDiagnostic;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = match Config::try_from(cli) {
        Ok(config) => config,
        Err(err @ ConfigError::MissingUrl) => {
            eprintln!("{}", Cli::command().render_help());
            return Err(err).into_diagnostic();
        }
        Err(err) => return Err(err).into_diagnostic(),
    };

    info!(
        "Polling {} every {}, expecting {} successful fetches within {}{}",
        config.url,
        humantime::format_duration(config.delay),
        config.count,
        humantime::format_duration(config.predicted),
        if config.forever { " (running forever)" } else { "" },
    );

    let trust = TrustRoots::load(config.cert.as_deref()).into_diagnostic()?;

    let delay = config.delay;
    let mut poller = Poller::new(config, trust, std::io::stdout());

    let first = poller
        .started()
        .checked_add(delay)
        .ok_or(ConfigError::DelayTooLong(humantime::format_duration(delay)))
        .into_diagnostic()?;

    schedule::run(first, delay, async || poller.fetch().await)
        .await
        .into_diagnostic()?;

    info!("Exiting.");
    Ok(())
}
