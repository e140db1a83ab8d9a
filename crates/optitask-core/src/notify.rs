//! Notification glue.
//!
//! Turns timer events into user-facing messages and hands them to a
//! [`Notifier`]. Delivery is fire-and-forget: sinks never report back.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::TimerError;
use crate::events::{DiscardReason, Event};
use crate::storage::NotificationsConfig;
use crate::timer::{EventListener, SessionPhase, TimerMode};

/// Duration used for phase-transition messages.
pub const TRANSITION_NOTICE_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotifyOptions {
    pub kind: NotifyKind,
    /// How long the message should stay visible; sink default when `None`.
    pub duration_ms: Option<u64>,
    /// Play the completion sound along with the message.
    pub sound: bool,
}

impl NotifyOptions {
    pub fn new(kind: NotifyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn success() -> Self {
        Self::new(NotifyKind::Success)
    }

    pub fn error() -> Self {
        Self::new(NotifyKind::Error)
    }

    pub fn info() -> Self {
        Self::new(NotifyKind::Info)
    }

    pub fn warning() -> Self {
        Self::new(NotifyKind::Warning)
    }

    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn with_sound(mut self) -> Self {
        self.sound = true;
        self
    }
}

/// A message ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub options: NotifyOptions,
}

impl Notice {
    pub fn new(message: impl Into<String>, options: NotifyOptions) -> Self {
        Self {
            message: message.into(),
            options,
        }
    }
}

/// Sink for user-visible messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, options: NotifyOptions);
}

/// Keeps every notice in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, options: NotifyOptions) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice::new(message, options));
        }
    }
}

fn break_name(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::LongBreak => "Long",
        _ => "Short",
    }
}

/// User-facing message for a timer event, if it deserves one.
///
/// `SessionFinalized` is reported by the session recorder once the save
/// outcome is known.
pub fn notice_for(event: &Event) -> Option<Notice> {
    match event {
        Event::TimerStarted { mode, phase, .. } => {
            let message = match (mode, phase) {
                (TimerMode::Stopwatch, _) => "Stopwatch started!",
                (TimerMode::Pomodoro, SessionPhase::Work) => "Pomodoro work session started!",
                (TimerMode::Pomodoro, SessionPhase::ShortBreak) => "Short break started.",
                (TimerMode::Pomodoro, SessionPhase::LongBreak) => "Long break started.",
            };
            Some(Notice::new(message, NotifyOptions::success()))
        }
        Event::TimerPaused { .. } => Some(Notice::new("Timer paused", NotifyOptions::info())),
        Event::TimerResumed { .. } => Some(Notice::new("Timer resumed", NotifyOptions::info())),
        Event::PhaseCompleted { completed, next, .. } => {
            let message = match (completed, next) {
                (SessionPhase::Work, SessionPhase::LongBreak) => "Time for a long break!".to_string(),
                (SessionPhase::Work, _) => "Time for a short break!".to_string(),
                (finished, _) => format!("{} break finished! Time for work.", break_name(*finished)),
            };
            let options = NotifyOptions::info().with_sound();
            let options = if *completed == SessionPhase::Work {
                options.with_duration(TRANSITION_NOTICE_MS)
            } else {
                options
            };
            Some(Notice::new(message, options))
        }
        Event::SessionDiscarded { reason, .. } => Some(match reason {
            DiscardReason::ZeroDuration => {
                Notice::new("Session too short, not recorded.", NotifyOptions::info())
            }
            DiscardReason::NoTask => Notice::new(
                "No task selected, session not recorded.",
                NotifyOptions::warning(),
            ),
        }),
        Event::TimerReset { .. } => Some(Notice::new("Timer reset", NotifyOptions::info())),
        Event::ModeChanged { to, .. } => Some(Notice::new(
            format!("Switched to {to} mode"),
            NotifyOptions::info(),
        )),
        Event::SessionFinalized { .. }
        | Event::TimerStopped { .. }
        | Event::TaskSelected { .. }
        | Event::StateSnapshot { .. } => None,
    }
}

/// User-facing message for a rejected command.
pub fn notice_for_error(err: &TimerError, mode: TimerMode) -> Notice {
    match err {
        TimerError::NoTaskSelected { .. } => {
            let kind = match mode {
                TimerMode::Pomodoro => "Pomodoro",
                TimerMode::Stopwatch => "Stopwatch",
            };
            Notice::new(
                format!("Please select a task to start a {kind} work session."),
                NotifyOptions::warning(),
            )
        }
        TimerError::InvalidTransition { command: "start", .. } => {
            Notice::new("Timer is already running.", NotifyOptions::info())
        }
        other => Notice::new(other.to_string(), NotifyOptions::warning()),
    }
}

/// Event listener that forwards notices to a [`Notifier`].
#[derive(Clone)]
pub struct NotificationGlue {
    notifier: Arc<dyn Notifier>,
    config: NotificationsConfig,
}

impl NotificationGlue {
    pub fn new(notifier: Arc<dyn Notifier>, config: NotificationsConfig) -> Self {
        Self { notifier, config }
    }

    /// Deliver a notice, honouring the enabled/sound switches.
    pub fn deliver(&self, notice: Notice) {
        if !self.config.enabled {
            return;
        }
        let mut options = notice.options;
        options.sound &= self.config.sound;
        if options.duration_ms.is_none() {
            options.duration_ms = Some(self.config.default_duration_ms);
        }
        self.notifier.notify(&notice.message, options);
    }
}

impl EventListener for NotificationGlue {
    fn on_event(&mut self, event: &Event) {
        if let Some(notice) = notice_for(event) {
            self.deliver(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn completed(from: SessionPhase, next: SessionPhase) -> Event {
        Event::PhaseCompleted {
            mode: TimerMode::Pomodoro,
            completed: from,
            next,
            completed_pomodoros: 4,
            at: Utc::now(),
        }
    }

    #[test]
    fn work_completion_announces_break_with_sound() {
        let notice = notice_for(&completed(SessionPhase::Work, SessionPhase::LongBreak)).unwrap();
        assert_eq!(notice.message, "Time for a long break!");
        assert!(notice.options.sound);
        assert_eq!(notice.options.duration_ms, Some(TRANSITION_NOTICE_MS));

        let notice = notice_for(&completed(SessionPhase::LongBreak, SessionPhase::Work)).unwrap();
        assert_eq!(notice.message, "Long break finished! Time for work.");
    }

    #[test]
    fn finalized_sessions_are_left_to_the_recorder() {
        let event = Event::SessionFinalized {
            mode: TimerMode::Pomodoro,
            phase: SessionPhase::Work,
            task_id: "t1".into(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            duration_secs: 5,
            naturally_completed: false,
        };
        assert!(notice_for(&event).is_none());
    }

    #[test]
    fn missing_task_message_names_mode() {
        let err = TimerError::NoTaskSelected {
            phase: SessionPhase::Work,
        };
        let notice = notice_for_error(&err, TimerMode::Pomodoro);
        assert_eq!(
            notice.message,
            "Please select a task to start a Pomodoro work session."
        );
        assert_eq!(notice.options.kind, NotifyKind::Warning);
    }

    #[test]
    fn glue_respects_config_switches() {
        let sink = RecordingNotifier::new();
        let mut glue = NotificationGlue::new(
            Arc::new(sink.clone()),
            NotificationsConfig {
                enabled: true,
                sound: false,
                default_duration_ms: 3000,
            },
        );
        glue.on_event(&completed(SessionPhase::Work, SessionPhase::ShortBreak));
        let notices = sink.notices();
        assert_eq!(notices.len(), 1);
        assert!(!notices[0].options.sound);

        let mut muted = NotificationGlue::new(
            Arc::new(sink.clone()),
            NotificationsConfig {
                enabled: false,
                ..NotificationsConfig::default()
            },
        );
        muted.on_event(&Event::TimerReset { at: Utc::now() });
        assert_eq!(sink.notices().len(), 1);
    }

    #[test]
    fn default_duration_is_filled_in() {
        let sink = RecordingNotifier::new();
        let mut glue = NotificationGlue::new(Arc::new(sink.clone()), NotificationsConfig::default());
        glue.on_event(&Event::TimerReset { at: Utc::now() });
        assert_eq!(sink.notices()[0].options.duration_ms, Some(3000));
    }
}
