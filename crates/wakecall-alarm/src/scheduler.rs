use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    action::WakeAction,
    error::{AlarmError, Result},
    store::AlarmStore,
};

/// The single pending alarm: fire time plus the sleeping task that will
/// deliver it.
struct Armed {
    fire_at: DateTime<Utc>,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    armed: Option<Armed>,
    /// Bumped on every arm/cancel. A fire task only acts if its epoch is
    /// still current, so a superseded timer can never fire even if its
    /// abort races with the wakeup.
    epoch: u64,
}

/// Sole owner of the live timer and in-memory alarm state.
///
/// All transitions (arm, cancel, restore, fire) are serialised through one
/// mutex; exactly one timer task is alive at any instant. Every mutation is
/// written through to the [`AlarmStore`] before returning, so a crash right
/// after an `arm` still wakes you up.
#[derive(Clone)]
pub struct AlarmScheduler {
    store: AlarmStore,
    action: Arc<dyn WakeAction>,
    stale_after: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl AlarmScheduler {
    /// `stale_after` is the minimum margin a persisted alarm must still have
    /// at [`restore`](Self::restore) time to be trusted after an outage.
    pub fn new(store: AlarmStore, action: Arc<dyn WakeAction>, stale_after: Duration) -> Self {
        Self {
            store,
            action,
            stale_after,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Arm the alarm for `fire_at`, superseding any existing alarm.
    ///
    /// Past times are not rejected — the task fires as soon as the runtime
    /// schedules it. Validating that the time is forward-looking is the
    /// caller's job (it computed the time).
    pub fn arm(&self, fire_at: DateTime<Utc>) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(old) = inner.armed.take() {
            old.task.abort();
        }
        inner.epoch += 1;
        // Write-through before the timer starts: durable first, live second.
        self.store.save(fire_at)?;
        let task = self.spawn_fire_task(fire_at, inner.epoch);
        inner.armed = Some(Armed { fire_at, task });
        info!(fire_at = %fire_at, "alarm armed");
        Ok(())
    }

    /// Cancel the pending alarm, returning the time it was armed for.
    /// `Ok(None)` when nothing was armed — not an error.
    pub fn cancel(&self) -> Result<Option<DateTime<Utc>>> {
        let mut inner = self.inner.lock().unwrap();
        match inner.armed.take() {
            Some(old) => {
                old.task.abort();
                inner.epoch += 1;
                self.store.clear()?;
                info!(fire_at = %old.fire_at, "alarm cancelled");
                Ok(Some(old.fire_at))
            }
            None => Ok(None),
        }
    }

    /// The currently armed fire time, straight from memory.
    pub fn current_alarm(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().unwrap().armed.as_ref().map(|a| a.fire_at)
    }

    /// Re-arm from the persisted record. Called once at startup, before the
    /// service accepts requests.
    ///
    /// A record closer than `stale_after` to now (including already-past
    /// times) is discarded: after an outage of unknown length a late wake-up
    /// call is worse than none. Store failures degrade to Idle rather than
    /// aborting startup. Returns the restored fire time, if any.
    pub fn restore(&self) -> Option<DateTime<Utc>> {
        let fire_at = match self.store.load() {
            Ok(Some(t)) => t,
            Ok(None) => return None,
            Err(AlarmError::Parse(msg)) => {
                warn!("ignoring corrupt persisted alarm: {msg}");
                return None;
            }
            Err(e) => {
                error!("failed to load persisted alarm, starting idle: {e}");
                return None;
            }
        };

        if fire_at - Utc::now() < self.stale_after {
            info!(fire_at = %fire_at, "persisted alarm too old to restore, discarding");
            if let Err(e) = self.store.clear() {
                error!("failed to clear stale alarm record: {e}");
            }
            return None;
        }

        // Same as arm(), minus the store write — the record is already correct.
        let mut inner = self.inner.lock().unwrap();
        if let Some(old) = inner.armed.take() {
            old.task.abort();
        }
        inner.epoch += 1;
        let task = self.spawn_fire_task(fire_at, inner.epoch);
        inner.armed = Some(Armed { fire_at, task });
        info!(fire_at = %fire_at, "restored alarm");
        Some(fire_at)
    }

    /// Spawn the task that sleeps until `fire_at` and delivers the wake-up.
    ///
    /// On elapse the scheduler transitions to Idle *before* the action runs:
    /// a slow or failing call can never block a new arm, and a failure never
    /// resurrects the alarm.
    fn spawn_fire_task(&self, fire_at: DateTime<Utc>, epoch: u64) -> JoinHandle<()> {
        let store = self.store.clone();
        let action = Arc::clone(&self.action);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let delay = (fire_at - Utc::now())
                .to_std()
                .unwrap_or(std::time::Duration::ZERO);
            tokio::time::sleep(delay).await;

            {
                let mut inner = inner.lock().unwrap();
                if inner.epoch != epoch {
                    // Superseded between wakeup and lock acquisition.
                    return;
                }
                inner.armed = None;
                // Clear the durable shadow under the same lock, so a
                // concurrent arm cannot save a new record between the
                // transition and the clear and have it wiped. Store calls
                // are synchronous; only the action itself stays outside.
                if let Err(e) = store.clear() {
                    error!("failed to clear fired alarm record: {e}");
                }
            }

            info!(fire_at = %fire_at, "alarm fired, invoking wake-up action");
            if let Err(e) = action.wake().await {
                error!("wake-up action failed: {e}");
            }
        })
    }
}
