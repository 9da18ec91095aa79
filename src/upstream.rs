use std::time::Duration;

use tokio::time::sleep;
use tracing::trace;

/// Simulate a downstream network dependency with a fixed latency.
///
/// Suspends the calling task without occupying a worker thread, so other
/// in-flight requests keep making progress during the wait.
pub async fn simulate_call(delay: Duration) {
    trace!("Waiting {:?} on simulated upstream call", delay);
    sleep(delay).await;
}
