use crate::{
    config::{Config, FETCH_TIMEOUT},
    display,
    error::{AttemptError, PollerResult},
    trust::TrustRoots,
};
use reqwest::StatusCode;
use std::{fmt::Display, io::Write};
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Whether the poller wants another attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Progress {
    Running,
    Complete,
}

struct RunState {
    started: Instant,
    successes: u32,
}

/// Outcome of an attempt that received a response.
struct Response {
    status: StatusCode,
    untrusted: Option<String>,
}

/// Fetches the configured URL once per call and writes one report line for
/// each attempt to `out`.
pub(crate) struct Poller<W> {
    config: Config,
    trust: TrustRoots,
    state: RunState,
    out: W,
}

impl<W: Write> Poller<W> {
    /// Create a poller, marking the start of the run.
    pub(crate) fn new(config: Config, trust: TrustRoots, out: W) -> Self {
        Self {
            config,
            trust,
            state: RunState {
                started: Instant::now(),
                successes: 0,
            },
            out,
        }
    }

    pub(crate) fn started(&self) -> Instant {
        self.state.started
    }

    #[tracing::instrument(skip(self), fields(url = %self.config.url))]
    pub(crate) async fn fetch(&mut self) -> PollerResult<Progress> {
        let response = match self.attempt().await {
            Ok(response) => response,
            Err(err) => {
                debug!("Attempt failed: {err:?}");
                let message = format!("{err} for {}", self.config.url);
                self.report(message)?;
                return Ok(Progress::Running);
            }
        };

        let note = response
            .untrusted
            .map(|reason| format!(", untrusted SSL certificate: {reason}"))
            .unwrap_or_default();

        let message = format!(
            "HTTP Response Code: {}{note} for {}",
            response.status.as_u16(),
            self.config.url
        );
        self.report(message)?;

        if response.status == StatusCode::OK {
            self.state.successes = self.state.successes.saturating_add(1);
            debug!("Successful fetches: {}", self.state.successes);

            if !self.config.forever && self.state.successes == self.config.count {
                writeln!(
                    self.out,
                    "Exiting after {} successful fetches.",
                    self.config.count
                )?;
                info!("Success count reached");
                return Ok(Progress::Complete);
            }
        }

        Ok(Progress::Running)
    }

    /// Make one request, with its own client and connection.
    ///
    /// The client is dropped before returning so the connection is closed by
    /// the time the attempt is reported.
    async fn attempt(&self) -> Result<Response, AttemptError> {
        let url = Url::parse(&self.config.url)?;

        let (tls, observation) = self.trust.client_config()?;

        let client = reqwest::ClientBuilder::new()
            .use_preconfigured_tls(tls)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(AttemptError::Client)?;

        let status = client
            .get(url)
            .send()
            .await
            .map_err(AttemptError::Transport)?
            .status();

        Ok(Response {
            status,
            untrusted: observation.untrusted(),
        })
    }

    fn report(&mut self, message: impl Display) -> std::io::Result<()> {
        let elapsed = self.state.started.elapsed();

        writeln!(
            self.out,
            "{} ({}) {message}",
            display::elapsed(elapsed),
            display::remaining(self.config.predicted, elapsed)
        )
    }
}
