use serde::Serialize;

use super::durations::PhaseDurations;
use super::state::{RunState, SessionPhase, TimerMode, TimerState};

/// Render seconds as `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_clock(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Display-ready projection of a [`TimerState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerView {
    pub clock: String,
    pub label: &'static str,
    pub hint: &'static str,
    pub mode: TimerMode,
    pub run_state: RunState,
    pub task_id: Option<String>,
    /// Position inside the current long-break cycle, e.g. `2 / 4`.
    pub cycle_progress: String,
    pub total_completed: u32,
    pub can_select_task: bool,
    pub can_start: bool,
}

impl TimerView {
    pub fn from(state: &TimerState, durations: &PhaseDurations) -> Self {
        let (label, hint) = match (state.mode, state.phase) {
            (TimerMode::Stopwatch, _) => match state.run_state {
                RunState::Idle => ("Stopwatch", "Select a task and start tracking."),
                _ => ("Stopwatch", "Tracking..."),
            },
            (TimerMode::Pomodoro, SessionPhase::Work) => ("Work Session", "Time to focus!"),
            (TimerMode::Pomodoro, SessionPhase::ShortBreak) => {
                ("Short Break", "Take a quick breather.")
            }
            (TimerMode::Pomodoro, SessionPhase::LongBreak) => {
                ("Long Break", "Time for a longer rest.")
            }
        };

        let every = durations.pomodoros_per_long_break.max(1);
        let running_work =
            state.run_state == RunState::Running && state.phase == SessionPhase::Work;
        let needs_task = state.phase == SessionPhase::Work && state.selected_task_id.is_none();

        Self {
            clock: format_clock(state.counter_secs),
            label,
            hint,
            mode: state.mode,
            run_state: state.run_state,
            task_id: state.selected_task_id.clone(),
            cycle_progress: format!("{} / {every}", state.completed_pomodoros % every),
            total_completed: state.completed_pomodoros,
            can_select_task: !running_work,
            can_start: state.run_state != RunState::Running && !needs_task,
        }
    }
}
