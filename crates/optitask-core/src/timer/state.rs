use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::durations::PhaseDurations;

/// How the timer measures a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Fixed-length countdown phases alternating with breaks.
    #[default]
    Pomodoro,
    /// Free-running count-up work session.
    Stopwatch,
}

impl TimerMode {
    /// Counter value a fresh `Work` phase starts from in this mode.
    pub fn initial_counter(self, durations: &PhaseDurations) -> u64 {
        match self {
            TimerMode::Pomodoro => durations.work_secs,
            TimerMode::Stopwatch => 0,
        }
    }

    /// Pomodoro phases count down to zero; a Stopwatch counts up.
    pub fn counts_down(self) -> bool {
        self == TimerMode::Pomodoro
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerMode::Pomodoro => f.write_str("pomodoro"),
            TimerMode::Stopwatch => f.write_str("stopwatch"),
        }
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pomodoro" => Ok(TimerMode::Pomodoro),
            "stopwatch" | "custom" => Ok(TimerMode::Stopwatch),
            other => Err(format!("unknown timer mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Work => f.write_str("work"),
            SessionPhase::ShortBreak => f.write_str("short break"),
            SessionPhase::LongBreak => f.write_str("long break"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Running => f.write_str("running"),
            RunState::Paused => f.write_str("paused"),
        }
    }
}

/// Externally observable snapshot of the engine.
///
/// `counter_secs` counts down in Pomodoro mode and up in Stopwatch mode.
/// `session_started_at` is set while the current phase has been started and
/// not yet finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub phase: SessionPhase,
    pub run_state: RunState,
    pub counter_secs: u64,
    pub session_started_at: Option<DateTime<Utc>>,
    pub selected_task_id: Option<String>,
    pub completed_pomodoros: u32,
}

impl TimerState {
    /// Fresh `Idle(Work)` state for `mode`.
    pub fn initial(mode: TimerMode, durations: &PhaseDurations) -> Self {
        Self {
            mode,
            phase: SessionPhase::Work,
            run_state: RunState::Idle,
            counter_secs: mode.initial_counter(durations),
            session_started_at: None,
            selected_task_id: None,
            completed_pomodoros: 0,
        }
    }

    /// A session has been started and not yet finalized.
    pub fn is_active(&self) -> bool {
        self.run_state != RunState::Idle
    }

    /// An active work session that would produce a time entry if stopped.
    pub fn has_trackable_session(&self) -> bool {
        self.is_active()
            && self.phase == SessionPhase::Work
            && self.session_started_at.is_some()
            && self.selected_task_id.is_some()
    }
}
