use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub(crate) enum ConfigError {
    #[error("No URL specified")]
    MissingUrl,

    #[error("Delay between fetch attempts must be greater than zero")]
    ZeroDelay,

    #[error("Delay between fetch attempts is too long: {0}")]
    DelayTooLong(humantime::FormattedDuration),
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum TrustError {
    #[error("Failed to read cert file {path}: {source}")]
    ReadBundle {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("Certificate verifier error: {0}")]
    Verifier(#[from] rustls::client::VerifierBuilderError),
}

/// Failure of a single fetch attempt, reported and then discarded.
#[derive(thiserror::Error, Debug)]
pub(crate) enum AttemptError {
    #[error("Error creating request: {0}")]
    Request(#[from] url::ParseError),

    #[error("Error creating client: {0}")]
    Tls(#[from] TrustError),

    #[error("Error creating client: {0}")]
    Client(reqwest::Error),

    #[error("Error: {}", source_chain(.0))]
    Transport(reqwest::Error),
}

/// Render an error followed by each of its sources.
fn source_chain(err: &dyn std::error::Error) -> String {
    let mut s = err.to_string();
    let mut source = err.source();
    while let Some(err) = source {
        s.push_str(": ");
        s.push_str(&err.to_string());
        source = err.source();
    }
    s
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum PollerError {
    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

pub(crate) type TrustResult<T> = Result<T, TrustError>;
pub(crate) type PollerResult<T> = Result<T, PollerError>;
