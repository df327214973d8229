//! Reconciliation scheduler.
//!
//! Decay is applied by explicit ticks rather than by a clock inside the
//! items. Three things trigger a tick:
//!
//! - a new recognition batch (handled inside the session on ingest)
//! - the periodic timer, once per configured interval (hourly by default)
//! - the hosting view becoming active again after being in the background
//!
//! [`Scheduler::spawn`] runs the periodic timer and the "became active"
//! signal through one tokio task. The returned [`SchedulerHandle`] is the only
//! way to reach that task; dropping it stops the timer.
//!
//! ```ignore
//! let handle = Scheduler::new(Duration::from_secs(3600)).spawn(session.clone(), events_tx);
//! // app returns to the foreground:
//! handle.became_active();
//! // screen torn down:
//! handle.shutdown().await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::events::Event;
use crate::session::{FridgeSession, SharedSession};

/// Why a reconciliation pass ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReason {
    Periodic,
    BecameActive,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.interval())
    }

    /// Run one reconciliation pass over the session.
    pub fn tick(&self, session: &mut FridgeSession, reason: TickReason, now: DateTime<Utc>) -> Option<Event> {
        let event = session.tick(now);
        debug!(?reason, changed = event.is_some(), "reconciliation pass");
        event
    }

    /// Start the periodic timer.
    ///
    /// The first pass runs immediately. Decay events are sent to `events`;
    /// a closed receiver does not stop the timer.
    pub fn spawn(self, session: SharedSession, events: mpsc::UnboundedSender<Event>) -> SchedulerHandle {
        let wake = Arc::new(Notify::new());
        let task_wake = Arc::clone(&wake);

        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let reason = tokio::select! {
                    _ = timer.tick() => TickReason::Periodic,
                    _ = task_wake.notified() => TickReason::BecameActive,
                };
                let event = {
                    let mut session = session.lock().await;
                    self.tick(&mut session, reason, Utc::now())
                };
                if let Some(event) = event {
                    let _ = events.send(event);
                }
            }
        });

        SchedulerHandle {
            task: Some(task),
            wake,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }
}

/// Owner of the running timer task.
pub struct SchedulerHandle {
    task: Option<JoinHandle<()>>,
    wake: Arc<Notify>,
}

impl SchedulerHandle {
    /// Request an immediate pass, e.g. on a foreground transition.
    pub fn became_active(&self) {
        self.wake.notify_one();
    }

    /// Stop the timer and wait for the task to wind down.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
