//! Time-entry persistence.
//!
//! The engine owns no storage. Finished work intervals travel as
//! [`Event::SessionFinalized`](crate::Event) to the [`SessionRecorder`],
//! which turns them into [`NewTimeEntry`] records for a [`TimeEntryStore`].

mod http;
mod memory;
mod recorder;

pub use http::HttpTimeEntryStore;
pub use memory::MemoryTimeEntryStore;
pub use recorder::SessionRecorder;

use std::future::Future;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::PersistenceError;

/// Format the time-entry API uses for naive timestamps.
pub const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Whole-second [`API_TIMESTAMP_FORMAT`] on the wire; sub-seconds are dropped.
mod api_timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&at.format(API_TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Payload for creating an entry. Timestamps are UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    pub task_id: String,
    #[serde(with = "api_timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(with = "api_timestamp")]
    pub end_time: NaiveDateTime,
    pub duration_seconds: u64,
    pub is_pomodoro_session: bool,
}

impl NewTimeEntry {
    pub fn new(
        task_id: impl Into<String>,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        duration_seconds: u64,
        is_pomodoro_session: bool,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            start_time: started_at.naive_utc(),
            end_time: ended_at.naive_utc(),
            duration_seconds,
            is_pomodoro_session,
        }
    }

    /// Reject records the service would refuse anyway.
    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.task_id.trim().is_empty() {
            return Err(PersistenceError::Rejected("task_id is empty".into()));
        }
        if self.duration_seconds == 0 {
            return Err(PersistenceError::Rejected(
                "duration_seconds must be positive".into(),
            ));
        }
        if self.end_time < self.start_time {
            return Err(PersistenceError::Rejected(
                "end_time precedes start_time".into(),
            ));
        }
        Ok(())
    }
}

/// Entry as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub user_id: String,
    pub task_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration_seconds: Option<i64>,
    pub is_pomodoro_session: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Query for listing entries. Empty filter lists recent entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeEntryFilter {
    pub task_id: Option<String>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

impl TimeEntryFilter {
    pub fn matches(&self, entry: &TimeEntry) -> bool {
        if let Some(task_id) = &self.task_id {
            if &entry.task_id != task_id {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if entry.start_time < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if entry.start_time > to {
                return false;
            }
        }
        true
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(task_id) = &self.task_id {
            pairs.push(("task_id", task_id.clone()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("date_from", from.format(API_TIMESTAMP_FORMAT).to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", to.format(API_TIMESTAMP_FORMAT).to_string()));
        }
        pairs
    }
}

/// External time-entry service.
pub trait TimeEntryStore: Send + Sync + 'static {
    fn save(
        &self,
        entry: NewTimeEntry,
    ) -> impl Future<Output = Result<TimeEntry, PersistenceError>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    fn list(
        &self,
        filter: TimeEntryFilter,
    ) -> impl Future<Output = Result<Vec<TimeEntry>, PersistenceError>> + Send;
}
