use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{SessionPhase, TimerMode, TimerState};

/// Why a finished work interval was not handed to persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Measured duration rounded down to zero seconds.
    ZeroDuration,
    /// No task was selected when the interval ended.
    NoTask,
}

/// Every state change of the timer produces an Event.
/// The persistence adapter and the notification glue subscribe to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        phase: SessionPhase,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: SessionPhase,
        counter_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: SessionPhase,
        counter_secs: u64,
        at: DateTime<Utc>,
    },
    /// A work interval ended with a positive duration and a task to attribute it to.
    SessionFinalized {
        mode: TimerMode,
        phase: SessionPhase,
        task_id: String,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        duration_secs: u64,
        naturally_completed: bool,
    },
    SessionDiscarded {
        phase: SessionPhase,
        reason: DiscardReason,
        at: DateTime<Utc>,
    },
    /// A phase reached its target and the engine moved to the next one.
    PhaseCompleted {
        mode: TimerMode,
        completed: SessionPhase,
        next: SessionPhase,
        completed_pomodoros: u32,
        at: DateTime<Utc>,
    },
    TimerStopped {
        phase: SessionPhase,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: TimerMode,
        to: TimerMode,
        at: DateTime<Utc>,
    },
    TaskSelected {
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::SessionFinalized { .. } => "session_finalized",
            Event::SessionDiscarded { .. } => "session_discarded",
            Event::PhaseCompleted { .. } => "phase_completed",
            Event::TimerStopped { .. } => "timer_stopped",
            Event::TimerReset { .. } => "timer_reset",
            Event::ModeChanged { .. } => "mode_changed",
            Event::TaskSelected { .. } => "task_selected",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
