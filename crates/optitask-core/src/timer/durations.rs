use serde::{Deserialize, Serialize};

use super::state::SessionPhase;

/// Target lengths of the Pomodoro phases, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub work_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    /// Every n-th completed work phase is followed by a long break.
    pub pomodoros_per_long_break: u32,
}

impl PhaseDurations {
    /// Build from minute values.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn from_minutes(work: u64, short_break: u64, long_break: u64, per_long_break: u32) -> Self {
        Self {
            work_secs: work.saturating_mul(60),
            short_break_secs: short_break.saturating_mul(60),
            long_break_secs: long_break.saturating_mul(60),
            pomodoros_per_long_break: per_long_break,
        }
    }

    pub fn target_secs(&self, phase: SessionPhase) -> u64 {
        match phase {
            SessionPhase::Work => self.work_secs,
            SessionPhase::ShortBreak => self.short_break_secs,
            SessionPhase::LongBreak => self.long_break_secs,
        }
    }

    /// Break that follows the `completed`-th finished work phase.
    pub fn break_after(&self, completed: u32) -> SessionPhase {
        let every = self.pomodoros_per_long_break.max(1);
        if completed > 0 && completed % every == 0 {
            SessionPhase::LongBreak
        } else {
            SessionPhase::ShortBreak
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::from_minutes(25, 5, 15, 4)
    }
}
