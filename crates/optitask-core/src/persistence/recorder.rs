use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tracing::{error, info, warn};

use super::{NewTimeEntry, TimeEntry, TimeEntryStore};
use crate::error::PersistenceError;
use crate::events::Event;
use crate::notify::{Notice, NotificationGlue, NotifyOptions};
use crate::timer::{EventListener, SessionPhase, TimerMode};

type SaveResult = Result<TimeEntry, PersistenceError>;

/// Saves finished work intervals.
///
/// Delivery is at-most-once: each save is spawned once and never retried,
/// and a failure only produces an error notice. The engine has already
/// moved on by the time the outcome is known.
///
/// Clones share their in-flight saves, so a clone kept outside the timer
/// service can [`drain`](Self::drain) them before the runtime shuts down.
pub struct SessionRecorder<S: TimeEntryStore> {
    store: Arc<S>,
    notices: NotificationGlue,
    pending: Arc<Mutex<JoinSet<SaveResult>>>,
}

impl<S: TimeEntryStore> Clone for SessionRecorder<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notices: self.notices.clone(),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<S: TimeEntryStore> SessionRecorder<S> {
    pub fn new(store: Arc<S>, notices: NotificationGlue) -> Self {
        Self {
            store,
            notices,
            pending: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Entry for a finalized work interval; `None` for anything else.
    pub fn entry_for(event: &Event) -> Option<(NewTimeEntry, bool)> {
        match event {
            Event::SessionFinalized {
                mode,
                phase: SessionPhase::Work,
                task_id,
                started_at,
                ended_at,
                duration_secs,
                naturally_completed,
            } if *duration_secs > 0 => {
                let is_pomodoro = *mode == TimerMode::Pomodoro;
                let entry = NewTimeEntry::new(
                    task_id.clone(),
                    *started_at,
                    *ended_at,
                    *duration_secs,
                    is_pomodoro,
                );
                Some((entry, is_pomodoro && *naturally_completed))
            }
            _ => None,
        }
    }

    /// Spawn the save for `event` on the current tokio runtime.
    ///
    /// Must be called from within a runtime. Returns `false` when the event
    /// has nothing to save.
    pub fn record(&self, event: &Event) -> bool {
        let Some((entry, completed_pomodoro)) = Self::entry_for(event) else {
            return false;
        };
        let store = Arc::clone(&self.store);
        let notices = self.notices.clone();

        let Ok(mut pending) = self.pending.lock() else {
            error!(task_id = %entry.task_id, "save queue poisoned, time entry dropped");
            return false;
        };
        // Reap finished saves so the set only holds in-flight ones.
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            let task_id = entry.task_id.clone();
            match store.save(entry).await {
                Ok(saved) => {
                    info!(entry_id = %saved.id, %task_id, "time entry saved");
                    let message = if completed_pomodoro {
                        "Pomodoro work session completed & saved!"
                    } else {
                        "Time entry saved!"
                    };
                    notices.deliver(Notice::new(message, NotifyOptions::success()));
                    Ok(saved)
                }
                Err(err) => {
                    error!(error = %err, %task_id, "failed to save time entry");
                    notices.deliver(Notice::new(
                        "Failed to save time entry",
                        NotifyOptions::error(),
                    ));
                    Err(err)
                }
            }
        });
        true
    }

    /// Number of saves spawned and not yet drained.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().map(|pending| pending.len()).unwrap_or(0)
    }

    /// Wait for every save spawned so far and return their outcomes.
    ///
    /// Saves already reaped by [`record`](Self::record) are not reported again.
    pub async fn drain(&self) -> Vec<SaveResult> {
        let mut saves = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return Vec::new(),
        };
        let mut results = Vec::with_capacity(saves.len());
        while let Some(joined) = saves.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => warn!(error = %err, "save task did not finish"),
            }
        }
        results
    }
}

impl<S: TimeEntryStore> EventListener for SessionRecorder<S> {
    fn on_event(&mut self, event: &Event) {
        // The engine never waits on persistence; `drain` collects the outcome.
        self.record(event);
    }
}
