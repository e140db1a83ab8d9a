//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` once per
//! second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle(Work) -> Running(Work) <-> Paused(Work)
//! Running(Work) --countdown hits 0--> Idle(ShortBreak | LongBreak)
//! Running(Break) --countdown hits 0--> Idle(Work)
//! any active --stop()--> Idle(Work)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerMode::Pomodoro, PhaseDurations::default());
//! engine.select_task(Some("task-1".into()))?;
//! engine.start()?;
//! // Once per second while running:
//! let events = engine.tick(); // Non-empty when a phase finishes
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::clock::{whole_secs_between, Clock, SystemClock};
use super::durations::PhaseDurations;
use super::state::{RunState, SessionPhase, TimerMode, TimerState};
use crate::error::TimerError;
use crate::events::{DiscardReason, Event};

/// Core timer engine.
///
/// Pomodoro countdowns are recomputed from wall-clock anchors on every tick
/// (banked running time plus the current run segment), so late or missed
/// ticks never accumulate drift. Paused time is not banked.
pub struct TimerEngine {
    durations: PhaseDurations,
    state: TimerState,
    /// Running time of closed run segments in the current phase.
    banked_ms: i64,
    /// Start of the current run segment; `Some` only while running.
    segment_started_at: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("durations", &self.durations)
            .field("state", &self.state)
            .field("banked_ms", &self.banked_ms)
            .field("segment_started_at", &self.segment_started_at)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Create a new engine reading the system clock.
    ///
    /// Starts in `Idle(Work)` with the mode's default counter.
    pub fn new(mode: TimerMode, durations: PhaseDurations) -> Self {
        Self::with_clock(mode, durations, Arc::new(SystemClock))
    }

    pub fn with_clock(mode: TimerMode, durations: PhaseDurations, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: TimerState::initial(mode, &durations),
            durations,
            banked_ms: 0,
            segment_started_at: None,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn durations(&self) -> &PhaseDurations {
        &self.durations
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state.clone(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh phase from `Idle`, or resume from `Paused`.
    pub fn start(&mut self) -> Result<Vec<Event>, TimerError> {
        match self.state.run_state {
            RunState::Running => self.reject(TimerError::InvalidTransition {
                command: "start",
                state: RunState::Running,
            }),
            RunState::Idle | RunState::Paused => {
                self.require_task()?;
                let now = self.clock.now();
                let resumed = self.state.run_state == RunState::Paused;
                if !resumed {
                    self.state.session_started_at = Some(now);
                    self.banked_ms = 0;
                }
                self.segment_started_at = Some(now);
                self.state.run_state = RunState::Running;
                debug!(mode = %self.state.mode, phase = %self.state.phase, resumed, "timer running");

                let event = if resumed {
                    Event::TimerResumed {
                        phase: self.state.phase,
                        counter_secs: self.state.counter_secs,
                        at: now,
                    }
                } else {
                    Event::TimerStarted {
                        mode: self.state.mode,
                        phase: self.state.phase,
                        at: now,
                    }
                };
                Ok(vec![event])
            }
        }
    }

    /// Toggle `Running` and `Paused`. Counters are left as they are.
    pub fn pause_toggle(&mut self) -> Result<Vec<Event>, TimerError> {
        match self.state.run_state {
            RunState::Idle => self.reject(TimerError::InvalidTransition {
                command: "pause",
                state: RunState::Idle,
            }),
            RunState::Running => {
                let now = self.clock.now();
                self.refresh_counter(now);
                self.banked_ms = self.running_ms(now);
                self.segment_started_at = None;
                self.state.run_state = RunState::Paused;
                debug!(counter_secs = self.state.counter_secs, "timer paused");
                Ok(vec![Event::TimerPaused {
                    phase: self.state.phase,
                    counter_secs: self.state.counter_secs,
                    at: now,
                }])
            }
            RunState::Paused => self.start(),
        }
    }

    /// End the active phase early.
    ///
    /// A Pomodoro work phase with at most one second left counts as
    /// naturally completed and advances to its break. A Stopwatch work
    /// session always counts as naturally completed.
    pub fn stop(&mut self) -> Result<Vec<Event>, TimerError> {
        if self.state.run_state == RunState::Idle {
            return self.reject(TimerError::InvalidTransition {
                command: "stop",
                state: RunState::Idle,
            });
        }

        let now = self.clock.now();
        self.refresh_counter(now);
        if self.state.phase == SessionPhase::Work && self.at_bell() {
            return Ok(self.complete_work(now));
        }
        Ok(self.end_phase(now))
    }

    /// Clear everything back to `Idle(Work)` with no completed pomodoros.
    ///
    /// Never finalizes the active session: callers that want it saved call
    /// `stop()` first. Mode and task selection are kept.
    pub fn reset(&mut self) -> Vec<Event> {
        self.rest_in_work();
        self.state.completed_pomodoros = 0;
        debug!("timer reset");
        vec![Event::TimerReset {
            at: self.clock.now(),
        }]
    }

    /// Switch mode. An active session is finalized first.
    ///
    /// A Pomodoro work phase at the bell still counts as completed; no break
    /// is announced.
    pub fn change_mode(&mut self, mode: TimerMode) -> Vec<Event> {
        let from = self.state.mode;
        if from == mode {
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.state.is_active() {
            let now = self.clock.now();
            self.refresh_counter(now);
            events = self.end_phase(now);
        }

        self.state.mode = mode;
        self.rest_in_work();
        debug!(%from, to = %mode, "timer mode changed");
        events.push(Event::ModeChanged {
            from,
            to: mode,
            at: self.clock.now(),
        });
        events
    }

    /// Choose the task work sessions are attributed to.
    ///
    /// Rejected while a work phase is running.
    pub fn select_task(&mut self, task_id: Option<String>) -> Result<Vec<Event>, TimerError> {
        if self.state.run_state == RunState::Running && self.state.phase == SessionPhase::Work {
            return self.reject(TimerError::InvalidTransition {
                command: "change task",
                state: RunState::Running,
            });
        }

        let task_id = task_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        self.state.selected_task_id = task_id.clone();
        debug!(task_id = ?task_id, "task selected");
        Ok(vec![Event::TaskSelected {
            task_id,
            at: self.clock.now(),
        }])
    }

    /// Advance time. Call once per second while running; a no-op otherwise.
    ///
    /// Reaching the target leaves `Running` in the same call, so a later
    /// tick can never complete the phase twice.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state.run_state != RunState::Running {
            return Vec::new();
        }

        let now = self.clock.now();
        self.refresh_counter(now);

        if self.state.mode == TimerMode::Stopwatch || self.state.counter_secs > 0 {
            return Vec::new();
        }

        match self.state.phase {
            SessionPhase::Work => self.complete_work(now),
            SessionPhase::ShortBreak | SessionPhase::LongBreak => self.complete_break(now),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reject<T>(&self, err: TimerError) -> Result<T, TimerError> {
        warn!(error = %err, state = ?self.state.run_state, "timer command rejected");
        Err(err)
    }

    fn require_task(&self) -> Result<(), TimerError> {
        if self.state.phase == SessionPhase::Work && self.state.selected_task_id.is_none() {
            return self.reject(TimerError::NoTaskSelected {
                phase: SessionPhase::Work,
            });
        }
        Ok(())
    }

    fn running_ms(&self, now: DateTime<Utc>) -> i64 {
        let segment = self
            .segment_started_at
            .map(|start| (now - start).num_milliseconds().max(0))
            .unwrap_or(0);
        self.banked_ms.saturating_add(segment)
    }

    /// Recompute the displayed counter from the clock. Only moves while running.
    fn refresh_counter(&mut self, now: DateTime<Utc>) {
        if self.state.run_state != RunState::Running {
            return;
        }
        match self.state.mode {
            TimerMode::Stopwatch => {
                if let Some(started) = self.state.session_started_at {
                    self.state.counter_secs = whole_secs_between(started, now);
                }
            }
            TimerMode::Pomodoro => {
                let target = self.durations.target_secs(self.state.phase);
                let elapsed = u64::try_from(self.running_ms(now) / 1000).unwrap_or(0);
                self.state.counter_secs = target.saturating_sub(elapsed);
            }
        }
    }

    /// Pomodoro countdown with at most one second left.
    fn at_bell(&self) -> bool {
        self.state.mode.counts_down() && self.state.counter_secs <= 1
    }

    /// Close the active phase at `now` and rest in `Idle(Work)`.
    ///
    /// Callers check that a phase is active and refresh the counter first.
    fn end_phase(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let phase = self.state.phase;
        let mut events = Vec::new();
        if phase == SessionPhase::Work {
            let at_bell = self.at_bell();
            let naturally_completed = self.state.mode == TimerMode::Stopwatch || at_bell;
            events.extend(self.finalize_work(now, naturally_completed));
            if at_bell {
                self.state.completed_pomodoros = self.state.completed_pomodoros.saturating_add(1);
            }
        }
        self.rest_in_work();
        debug!(%phase, "timer stopped");
        events.push(Event::TimerStopped { phase, at: now });
        events
    }

    /// Describe the work interval ending at `now`. Breaks never reach here.
    fn finalize_work(&self, now: DateTime<Utc>, naturally_completed: bool) -> Option<Event> {
        let started_at = self.state.session_started_at?;
        let duration_secs = whole_secs_between(started_at, now);

        let discard = |reason: DiscardReason| {
            warn!(?reason, "work session not recorded");
            Some(Event::SessionDiscarded {
                phase: SessionPhase::Work,
                reason,
                at: now,
            })
        };

        if duration_secs == 0 {
            return discard(DiscardReason::ZeroDuration);
        }
        let Some(task_id) = self.state.selected_task_id.clone() else {
            return discard(DiscardReason::NoTask);
        };

        debug!(%task_id, duration_secs, naturally_completed, "work session finalized");
        Some(Event::SessionFinalized {
            mode: self.state.mode,
            phase: SessionPhase::Work,
            task_id,
            started_at,
            ended_at: now,
            duration_secs,
            naturally_completed,
        })
    }

    fn complete_work(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events: Vec<Event> = self.finalize_work(now, true).into_iter().collect();

        self.state.completed_pomodoros = self.state.completed_pomodoros.saturating_add(1);
        let next = self.durations.break_after(self.state.completed_pomodoros);
        self.enter_idle_phase(next);
        debug!(%next, completed = self.state.completed_pomodoros, "work phase completed");

        events.push(Event::PhaseCompleted {
            mode: self.state.mode,
            completed: SessionPhase::Work,
            next,
            completed_pomodoros: self.state.completed_pomodoros,
            at: now,
        });
        events
    }

    fn complete_break(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let completed = self.state.phase;
        self.rest_in_work();
        debug!(%completed, "break finished");
        vec![Event::PhaseCompleted {
            mode: self.state.mode,
            completed,
            next: SessionPhase::Work,
            completed_pomodoros: self.state.completed_pomodoros,
            at: now,
        }]
    }

    fn rest_in_work(&mut self) {
        self.enter_idle_phase(SessionPhase::Work);
    }

    fn enter_idle_phase(&mut self, phase: SessionPhase) {
        self.state.phase = phase;
        self.state.run_state = RunState::Idle;
        self.state.session_started_at = None;
        self.state.counter_secs = match (self.state.mode, phase) {
            (TimerMode::Stopwatch, _) => 0,
            (TimerMode::Pomodoro, phase) => self.durations.target_secs(phase),
        };
        self.banked_ms = 0;
        self.segment_started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::clock::ManualClock;
    use chrono::TimeZone;

    fn engine(mode: TimerMode) -> (TimerEngine, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap());
        let engine = TimerEngine::with_clock(mode, PhaseDurations::default(), Arc::new(clock.clone()));
        (engine, clock)
    }

    fn run_secs(engine: &mut TimerEngine, clock: &ManualClock, secs: u64) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..secs {
            clock.advance_secs(1);
            events.extend(engine.tick());
        }
        events
    }

    #[test]
    fn start_requires_task_for_work() {
        let (mut engine, _) = engine(TimerMode::Pomodoro);
        let before = engine.state().clone();
        assert_eq!(
            engine.start(),
            Err(TimerError::NoTaskSelected {
                phase: SessionPhase::Work
            })
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn start_pause_resume() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        assert_eq!(engine.state().run_state, RunState::Running);
        let started = engine.state().session_started_at;
        assert!(started.is_some());

        run_secs(&mut engine, &clock, 10);
        engine.pause_toggle().unwrap();
        assert_eq!(engine.state().run_state, RunState::Paused);
        assert_eq!(engine.state().counter_secs, 1490);

        // Paused time does not count against the countdown.
        clock.advance_secs(300);
        let events = engine.pause_toggle().unwrap();
        assert!(matches!(events[0], Event::TimerResumed { .. }));
        assert_eq!(engine.state().session_started_at, started);
        run_secs(&mut engine, &clock, 5);
        assert_eq!(engine.state().counter_secs, 1485);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let (mut engine, _) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        assert!(matches!(
            engine.start(),
            Err(TimerError::InvalidTransition { command: "start", .. })
        ));
    }

    #[test]
    fn pause_and_stop_rejected_when_idle() {
        let (mut engine, _) = engine(TimerMode::Stopwatch);
        assert!(engine.pause_toggle().is_err());
        assert!(engine.stop().is_err());
    }

    #[test]
    fn countdown_completes_once_into_short_break() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();

        let events = run_secs(&mut engine, &clock, 1500);
        let completions = events
            .iter()
            .filter(|e| matches!(e, Event::PhaseCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::SessionFinalized { duration_secs: 1500, naturally_completed: true, .. }
        )));

        let state = engine.state();
        assert_eq!(state.phase, SessionPhase::ShortBreak);
        assert_eq!(state.run_state, RunState::Idle);
        assert_eq!(state.counter_secs, 300);
        assert_eq!(state.completed_pomodoros, 1);
        assert!(state.session_started_at.is_none());

        // Further ticks are inert.
        assert!(run_secs(&mut engine, &clock, 5).is_empty());
    }

    #[test]
    fn late_tick_clamps_to_zero() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        clock.advance_secs(4000);
        let events = engine.tick();
        assert_eq!(events.len(), 2);
        assert_eq!(engine.state().completed_pomodoros, 1);
    }

    #[test]
    fn break_completion_returns_to_idle_work() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        run_secs(&mut engine, &clock, 1500);

        engine.start().unwrap();
        let events = run_secs(&mut engine, &clock, 300);
        assert_eq!(
            events,
            vec![Event::PhaseCompleted {
                mode: TimerMode::Pomodoro,
                completed: SessionPhase::ShortBreak,
                next: SessionPhase::Work,
                completed_pomodoros: 1,
                at: clock.now(),
            }]
        );
        assert_eq!(engine.state().phase, SessionPhase::Work);
        assert_eq!(engine.state().counter_secs, 1500);
        assert_eq!(engine.state().run_state, RunState::Idle);
    }

    #[test]
    fn breaks_start_without_task() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        run_secs(&mut engine, &clock, 1500);
        engine.select_task(None).unwrap();
        assert!(engine.start().is_ok());
    }

    #[test]
    fn stop_early_is_not_natural() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        clock.advance_secs(5);
        let events = engine.stop().unwrap();
        assert!(matches!(
            events[0],
            Event::SessionFinalized { duration_secs: 5, naturally_completed: false, .. }
        ));
        assert_eq!(engine.state().run_state, RunState::Idle);
        assert_eq!(engine.state().completed_pomodoros, 0);
        assert_eq!(engine.state().counter_secs, 1500);
    }

    #[test]
    fn stop_with_one_second_left_completes_naturally() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        run_secs(&mut engine, &clock, 1499);
        let events = engine.stop().unwrap();
        assert!(matches!(
            events[0],
            Event::SessionFinalized { naturally_completed: true, .. }
        ));
        assert_eq!(engine.state().phase, SessionPhase::ShortBreak);
        assert_eq!(engine.state().completed_pomodoros, 1);
    }

    #[test]
    fn stop_at_zero_seconds_discards() {
        let (mut engine, _) = engine(TimerMode::Stopwatch);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        let events = engine.stop().unwrap();
        assert!(matches!(
            events[0],
            Event::SessionDiscarded { reason: DiscardReason::ZeroDuration, .. }
        ));
        assert!(!events.iter().any(|e| matches!(e, Event::SessionFinalized { .. })));
    }

    #[test]
    fn stopping_a_break_persists_nothing() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        run_secs(&mut engine, &clock, 1500);
        engine.start().unwrap();
        clock.advance_secs(30);
        let events = engine.stop().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::TimerStopped { phase: SessionPhase::ShortBreak, .. }));
        assert_eq!(engine.state().phase, SessionPhase::Work);
    }

    #[test]
    fn stopwatch_recomputes_from_start() {
        let (mut engine, clock) = engine(TimerMode::Stopwatch);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        // Jittery delivery: two ticks arrive late, one early.
        for step in [1, 2, 1, 1, 1, 1] {
            clock.advance_secs(step);
            engine.tick();
        }
        assert_eq!(engine.state().counter_secs, 7);

        let events = engine.stop().unwrap();
        assert!(matches!(
            events[0],
            Event::SessionFinalized { duration_secs: 7, naturally_completed: true, mode: TimerMode::Stopwatch, .. }
        ));
    }

    #[test]
    fn select_task_rejected_while_working() {
        let (mut engine, _) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        assert!(engine.select_task(Some("t2".into())).is_err());
        assert_eq!(engine.state().selected_task_id.as_deref(), Some("t1"));

        engine.pause_toggle().unwrap();
        assert!(engine.select_task(Some("t2".into())).is_ok());
    }

    #[test]
    fn resume_without_task_is_rejected() {
        let (mut engine, _) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        engine.pause_toggle().unwrap();
        engine.select_task(None).unwrap();
        assert!(matches!(
            engine.pause_toggle(),
            Err(TimerError::NoTaskSelected { .. })
        ));
        assert_eq!(engine.state().run_state, RunState::Paused);
    }

    #[test]
    fn reset_goes_to_beginning() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        run_secs(&mut engine, &clock, 1500);
        engine.start().unwrap();
        engine.reset();

        let state = engine.state();
        assert_eq!(state.phase, SessionPhase::Work);
        assert_eq!(state.run_state, RunState::Idle);
        assert_eq!(state.completed_pomodoros, 0);
        assert_eq!(state.counter_secs, 1500);
        assert_eq!(state.selected_task_id.as_deref(), Some("t1"));
    }

    #[test]
    fn change_mode_stops_active_session() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        clock.advance_secs(42);

        let events = engine.change_mode(TimerMode::Stopwatch);
        assert!(matches!(
            events.first(),
            Some(Event::SessionFinalized { duration_secs: 42, naturally_completed: false, .. })
        ));
        assert!(matches!(events.last(), Some(Event::ModeChanged { .. })));
        assert_eq!(engine.state().mode, TimerMode::Stopwatch);
        assert_eq!(engine.state().counter_secs, 0);
        assert_eq!(engine.state().run_state, RunState::Idle);
    }

    #[test]
    fn change_mode_at_bell_counts_without_announcing_break() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        run_secs(&mut engine, &clock, 1499);

        let events = engine.change_mode(TimerMode::Stopwatch);
        assert!(matches!(
            events[0],
            Event::SessionFinalized { duration_secs: 1499, naturally_completed: true, .. }
        ));
        assert!(!events.iter().any(|e| matches!(e, Event::PhaseCompleted { .. })));
        assert!(matches!(events[1], Event::TimerStopped { phase: SessionPhase::Work, .. }));
        assert!(matches!(events[2], Event::ModeChanged { .. }));

        let state = engine.state();
        assert_eq!(state.completed_pomodoros, 1);
        assert_eq!(state.phase, SessionPhase::Work);
        assert_eq!(state.mode, TimerMode::Stopwatch);
    }

    #[test]
    fn change_mode_while_on_break_keeps_count() {
        let (mut engine, clock) = engine(TimerMode::Pomodoro);
        engine.select_task(Some("t1".into())).unwrap();
        engine.start().unwrap();
        run_secs(&mut engine, &clock, 1500);
        engine.start().unwrap();
        clock.advance_secs(10);

        let events = engine.change_mode(TimerMode::Stopwatch);
        assert!(matches!(events[0], Event::TimerStopped { phase: SessionPhase::ShortBreak, .. }));
        assert_eq!(engine.state().completed_pomodoros, 1);
        assert_eq!(engine.state().phase, SessionPhase::Work);
    }

    #[test]
    fn change_to_same_mode_is_noop() {
        let (mut engine, _) = engine(TimerMode::Pomodoro);
        assert!(engine.change_mode(TimerMode::Pomodoro).is_empty());
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let (engine, _) = engine(TimerMode::Pomodoro);
        match engine.snapshot() {
            Event::StateSnapshot { state, .. } => {
                assert_eq!(state.run_state, RunState::Idle);
                assert_eq!(state.counter_secs, 25 * 60);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
