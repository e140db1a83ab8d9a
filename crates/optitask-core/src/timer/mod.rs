mod clock;
mod durations;
mod engine;
mod service;
mod state;
mod view;

pub use clock::{whole_secs_between, Clock, ManualClock, SystemClock, TokioClock};
pub use durations::PhaseDurations;
pub use engine::TimerEngine;
pub use service::{EventListener, TimerHandle, TimerService, TICK_INTERVAL};
pub use state::{RunState, SessionPhase, TimerMode, TimerState};
pub use view::{format_clock, TimerView};
