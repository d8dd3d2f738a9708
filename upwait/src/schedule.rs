use crate::{error::PollerResult, poller::Progress};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Call `fetch` once per `delay`, starting at `first`, until it reports
/// completion.
///
/// Each call runs to completion before the next tick is awaited. A call that
/// outlasts the delay pushes the following ticks back instead of queueing them.
pub(crate) async fn run<F>(first: Instant, delay: Duration, mut fetch: F) -> PollerResult<()>
where
    F: AsyncFnMut() -> PollerResult<Progress>,
{
    let mut ticker = tokio::time::interval_at(first, delay);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let _ = ticker.tick().await;

        if fetch().await? == Progress::Complete {
            return Ok(());
        }
    }
}
