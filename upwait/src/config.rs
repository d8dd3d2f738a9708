use crate::error::ConfigError;
use clap::{ArgAction, Parser};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

/// Time allowed for a single fetch attempt before it is abandoned.
pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Poll a URL until it has answered with HTTP 200 enough times.
///
/// Prints one line per attempt with the time elapsed since start and the time
/// remaining until the predicted deadline.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version = crate::version::version!(),
)]
pub(crate) struct Cli {
    /// URL to fetch
    #[arg(long, env = "UPWAIT_URL")]
    pub(crate) url: Option<String>,

    /// Expected time for the URL to become available
    #[arg(long, env = "UPWAIT_PREDICTED", default_value = "10m", value_parser = humantime::parse_duration)]
    pub(crate) predicted: Duration,

    /// Delay between fetch attempts
    #[arg(long, env = "UPWAIT_DELAY", default_value = "3s", value_parser = humantime::parse_duration)]
    pub(crate) delay: Duration,

    /// Number of successful fetches before program exit
    #[arg(long, env = "UPWAIT_COUNT", default_value_t = 5)]
    pub(crate) count: u32,

    /// Keep running indefinitely even after meeting success count
    #[arg(
        long,
        env = "UPWAIT_FOREVER",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
    )]
    pub(crate) forever: bool,

    /// Path to additional cert file (PEM bundle)
    #[arg(long, env = "UPWAIT_CERT", value_name = "FILE")]
    pub(crate) cert: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) url: String,
    pub(crate) predicted: Duration,
    pub(crate) delay: Duration,
    pub(crate) count: u32,
    pub(crate) forever: bool,
    pub(crate) cert: Option<PathBuf>,
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let url = cli
            .url
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        if cli.delay.is_zero() {
            return Err(ConfigError::ZeroDelay);
        }

        // The first tick is scheduled one delay after start
        if Instant::now().checked_add(cli.delay).is_none() {
            return Err(ConfigError::DelayTooLong(humantime::format_duration(
                cli.delay,
            )));
        }

        Ok(Self {
            url,
            predicted: cli.predicted,
            delay: cli.delay,
            count: cli.count,
            forever: cli.forever,
            cert: cli.cert.filter(|path| !path.is_empty()).map(PathBuf::from),
        })
    }
}
