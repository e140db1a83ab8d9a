use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use super::{NewTimeEntry, TimeEntry, TimeEntryFilter, TimeEntryStore};
use crate::error::PersistenceError;

/// In-process store used offline and in tests.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryTimeEntryStore {
    user_id: String,
    entries: Arc<Mutex<Vec<TimeEntry>>>,
    save_attempts: Arc<Mutex<Vec<NewTimeEntry>>>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryTimeEntryStore {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Make every following `save` fail with a 503.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn entries(&self) -> Vec<TimeEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Every payload `save` was called with, failed ones included.
    pub fn save_attempts(&self) -> Vec<NewTimeEntry> {
        self.save_attempts
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    fn lock_entries(&self) -> Result<std::sync::MutexGuard<'_, Vec<TimeEntry>>, PersistenceError> {
        self.entries
            .lock()
            .map_err(|_| PersistenceError::Network("memory store poisoned".into()))
    }
}

impl TimeEntryStore for MemoryTimeEntryStore {
    async fn save(&self, entry: NewTimeEntry) -> Result<TimeEntry, PersistenceError> {
        if let Ok(mut attempts) = self.save_attempts.lock() {
            attempts.push(entry.clone());
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Http {
                status: 503,
                message: "time-entry service unavailable".into(),
            });
        }
        entry.validate()?;

        let now = Utc::now().naive_utc();
        let stored = TimeEntry {
            id: Uuid::new_v4(),
            user_id: self.user_id.clone(),
            task_id: entry.task_id,
            start_time: entry.start_time,
            end_time: Some(entry.end_time),
            duration_seconds: i64::try_from(entry.duration_seconds).ok(),
            is_pomodoro_session: entry.is_pomodoro_session,
            created_at: now,
            updated_at: now,
        };
        self.lock_entries()?.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<(), PersistenceError> {
        let mut entries = self.lock_entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(PersistenceError::Http {
                status: 404,
                message: format!("TimeEntry with id {id} not found"),
            });
        }
        Ok(())
    }

    async fn list(&self, filter: TimeEntryFilter) -> Result<Vec<TimeEntry>, PersistenceError> {
        let entries = self.lock_entries()?;
        let mut matched: Vec<TimeEntry> = entries.iter().filter(|e| filter.matches(e)).cloned().collect();
        matched.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(matched)
    }
}
