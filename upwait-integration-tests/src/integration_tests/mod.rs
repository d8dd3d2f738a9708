#[ctor::ctor]
fn init() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .init();
}

mod exit_codes;
mod success_count;
mod untrusted_certificate;

use std::time::Duration;

/// Generous enough to cover `cargo run` building the binary first.
const EXIT_TIMEOUT: Duration = Duration::from_secs(600);
