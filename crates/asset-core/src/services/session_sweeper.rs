//! Periodic removal of expired sessions
//!
//! Expired tokens are already rejected at validation time; the sweep only
//! keeps the table small. Failures are logged and the loop carries on.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::services::SessionManager;

/// Handle to the running sweep task.
pub struct SessionSweeper {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl SessionSweeper {
    /// Start sweeping every `period`. The task ends when `shutdown` (or the
    /// child token cancelled by [`SessionSweeper::stop`]) fires.
    pub fn spawn(
        manager: Arc<SessionManager>,
        period: Duration,
        shutdown: &CancellationToken,
    ) -> Self {
        let cancel = shutdown.child_token();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "Session sweeper started");

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => match manager.sweep_expired().await {
                        Ok(0) => debug!("No expired sessions"),
                        Ok(removed) => info!(removed, "Removed expired sessions"),
                        Err(e) => error!("Failed to remove expired sessions: {}", e),
                    },
                }
            }

            info!("Session sweeper stopped");
        });

        Self { handle, cancel }
    }

    /// Signal the task and wait for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            error!("Session sweeper task failed: {}", e);
        }
    }
}
