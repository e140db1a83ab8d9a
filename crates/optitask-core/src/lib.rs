//! # OptiTask Core Library
//!
//! This library provides the session timer behind OptiTask's time tracking.
//! The CLI (and any other front end) is a thin presentation layer over the
//! same core.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine for Pomodoro and
//!   stopwatch sessions, driven by commands and a 1 Hz `tick()`
//! - **Timer Service**: A single tokio task that owns the engine and
//!   serializes commands with ticks
//! - **Persistence**: Finished work intervals become time entries saved
//!   through a [`TimeEntryStore`]
//! - **Notifications**: Events are turned into user-facing notices
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerService`] / [`TimerHandle`]: Async owner of the engine
//! - [`SessionRecorder`]: Saves finalized work sessions
//! - [`Config`]: Application configuration management

pub mod timer;
pub mod storage;
pub mod persistence;
pub mod notify;
pub mod events;
pub mod error;

pub use timer::{
    PhaseDurations, RunState, SessionPhase, TimerEngine, TimerHandle, TimerMode, TimerService,
    TimerState, TimerView,
};
pub use storage::Config;
pub use persistence::{
    HttpTimeEntryStore, MemoryTimeEntryStore, NewTimeEntry, SessionRecorder, TimeEntry,
    TimeEntryFilter, TimeEntryStore,
};
pub use notify::{NotificationGlue, Notifier, NotifyKind, NotifyOptions};
pub use events::Event;
pub use error::{ConfigError, CoreError, PersistenceError, TimerError};
