//! Periodic tick sources
//!
//! The runner never owns an OS timer directly. It asks a [`TickSource`] to
//! start delivering ticks and holds the returned [`TickHandle`]; cancelling or
//! dropping the handle stops delivery.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub at: Instant,
}

/// Starts tick delivery on request
pub trait TickSource: Send {
    fn acquire(&mut self) -> TickHandle;
}

/// Cancellation token for an acquired tick source. Released on drop.
pub struct TickHandle {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn cancel(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl std::fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHandle")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Tokio interval delivering ticks into a channel.
///
/// Ticks that find the channel full are dropped: elapsed time is derived from
/// the wall clock, so a coalesced tick loses nothing.
pub struct IntervalTickSource {
    period: Duration,
    sender: mpsc::Sender<Tick>,
}

impl IntervalTickSource {
    pub fn new(period: Duration, sender: mpsc::Sender<Tick>) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            sender,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TickSource for IntervalTickSource {
    fn acquire(&mut self) -> TickHandle {
        let period = self.period;
        let sender = self.sender.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let at = interval.tick().await;
                match sender.try_send(Tick { at }) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::debug!("Tick coalesced, consumer busy");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
        });

        tracing::debug!(period_ms = period.as_millis() as u64, "Tick source acquired");
        TickHandle::new(move || {
            task.abort();
            tracing::debug!("Tick source released");
        })
    }
}
