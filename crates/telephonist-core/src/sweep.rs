//! Periodic idle-session sweeper.
//!
//! Runs `clean_up` on a fixed period until cancelled. Missed ticks are
//! delayed rather than bursted, and the first tick fires one full period
//! after start.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Something that can close its idle sessions.
pub trait Sweep: Send + Sync {
    /// Close idle sessions and return how many were closed.
    fn sweep(&self) -> impl Future<Output = usize> + Send;
}

/// Drives a [`Sweep`] on a fixed period.
#[derive(Debug, Clone)]
pub struct IdleSweeper {
    period: Duration,
    cancel: CancellationToken,
}

impl IdleSweeper {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the sweeper when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the sweeper as a background task.
    pub fn spawn<S>(self, target: Arc<S>) -> JoinHandle<()>
    where
        S: Sweep + 'static,
    {
        tokio::spawn(async move { self.run(target.as_ref()).await })
    }

    /// Sweep every `period` until the cancellation token fires.
    pub async fn run<S: Sweep>(&self, target: &S) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        info!(period_secs = self.period.as_secs(), "Idle session sweeper started");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let closed = target.sweep().await;
                    if closed > 0 {
                        info!(closed, "Idle sessions closed");
                    } else {
                        debug!("No idle sessions");
                    }
                }
            }
        }
        info!("Idle session sweeper stopped");
    }
}
