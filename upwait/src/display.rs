use std::time::Duration;

/// Render the time since start, padded to six characters.
///
/// Shows hours and minutes once an hour has passed, minutes and seconds once a
/// minute has passed, and plain seconds before that.
pub(crate) fn elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    let s = if hours > 0 {
        format!("{hours}h{minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    };

    format!("{s:>6}")
}

/// Render the distance to the predicted deadline.
///
/// Overrun is shown as a positive magnitude followed by `ago`.
pub(crate) fn remaining(predicted: Duration, elapsed: Duration) -> String {
    let (magnitude, suffix) = match predicted.checked_sub(elapsed) {
        Some(left) => (left, "remaining"),
        None => (elapsed - predicted, "ago"),
    };

    let total = magnitude.as_secs();
    let minutes = total / 60;
    let seconds = total % 60;

    let s = if minutes > 0 {
        format!("{minutes}m{seconds}s {suffix}")
    } else {
        format!("{seconds}s {suffix}")
    };

    format!("{s:>6}")
}
