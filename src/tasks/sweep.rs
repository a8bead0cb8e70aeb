//! Rate Limit Sweep Task
//!
//! Background task that periodically forgets idle client identities so the
//! limiter does not grow without bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::limiter::RateLimiter;

/// Spawns a background task that sweeps stale limiter entries.
///
/// The task sleeps for `interval` between runs and holds the limiter's
/// write lock only for the duration of one sweep, so `allow` calls are
/// never blocked for longer than a single pass over the map.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let limiter = Arc::new(RwLock::new(RateLimiter::new(10, Duration::from_secs(60))));
/// let sweep_handle = spawn_sweep_task(limiter.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(
    limiter: Arc<RwLock<RateLimiter<String>>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting rate limit sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut guard = limiter.write().await;
                let removed = guard.sweep();
                (removed, guard.tracked())
            };

            if removed > 0 {
                info!(removed, remaining, "Rate limit sweep: dropped idle clients");
            } else {
                debug!(remaining, "Rate limit sweep: no idle clients");
            }
        }
    })
}
