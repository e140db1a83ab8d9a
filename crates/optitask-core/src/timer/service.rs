//! Single-owner timer service.
//!
//! One tokio task owns the [`TimerEngine`]. Commands arrive over a channel
//! and ticks come from a one-second interval that is only polled while the
//! timer is running, so commands and ticks never interleave and a stopped
//! timer receives no stray ticks.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

use super::engine::TimerEngine;
use super::state::{RunState, TimerMode, TimerState};
use crate::error::{CoreError, Result, TimerError};
use crate::events::Event;

/// Scheduler period.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// Reacts to engine events inside the service task.
///
/// Called synchronously after each transition; must not block.
pub trait EventListener: Send {
    fn on_event(&mut self, event: &Event);
}

#[derive(Debug)]
enum Command {
    Start,
    PauseToggle,
    Stop,
    Reset,
    ChangeMode(TimerMode),
    SelectTask(Option<String>),
}

impl Command {
    fn apply(self, engine: &mut TimerEngine) -> std::result::Result<Vec<Event>, TimerError> {
        match self {
            Command::Start => engine.start(),
            Command::PauseToggle => engine.pause_toggle(),
            Command::Stop => engine.stop(),
            Command::Reset => Ok(engine.reset()),
            Command::ChangeMode(mode) => Ok(engine.change_mode(mode)),
            Command::SelectTask(task_id) => engine.select_task(task_id),
        }
    }
}

enum Message {
    Command {
        command: Command,
        reply: oneshot::Sender<std::result::Result<Vec<Event>, TimerError>>,
    },
    Shutdown,
}

pub struct TimerService {
    engine: TimerEngine,
    listeners: Vec<Box<dyn EventListener>>,
    rx: mpsc::Receiver<Message>,
    state_tx: watch::Sender<TimerState>,
    events_tx: broadcast::Sender<Event>,
}

impl TimerService {
    /// Move `engine` into a new service task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        engine: TimerEngine,
        listeners: Vec<Box<dyn EventListener>>,
    ) -> (TimerHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(engine.state().clone());
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        let handle = TimerHandle {
            tx,
            state_rx,
            events_tx: events_tx.clone(),
        };
        let service = Self {
            engine,
            listeners,
            rx,
            state_tx,
            events_tx,
        };
        (handle, tokio::spawn(service.run()))
    }

    async fn run(mut self) {
        let mut ticker = new_ticker();
        loop {
            let running = self.engine.state().run_state == RunState::Running;
            tokio::select! {
                message = self.rx.recv() => match message {
                    Some(Message::Command { command, reply }) => {
                        trace!(?command, "timer command");
                        let result = command.apply(&mut self.engine);
                        if let Ok(events) = &result {
                            self.publish(events);
                        }
                        let now_running = self.engine.state().run_state == RunState::Running;
                        if now_running && !running {
                            ticker = new_ticker();
                        }
                        let _ = reply.send(result);
                    }
                    Some(Message::Shutdown) | None => break,
                },
                _ = ticker.tick(), if running => {
                    let events = self.engine.tick();
                    self.publish(&events);
                }
            }
        }
        debug!("timer service stopped");
    }

    fn publish(&mut self, events: &[Event]) {
        for event in events {
            for listener in self.listeners.iter_mut() {
                listener.on_event(event);
            }
            // No subscribers is fine.
            let _ = self.events_tx.send(event.clone());
        }
        self.state_tx.send_replace(self.engine.state().clone());
    }
}

fn new_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Cloneable handle to a running [`TimerService`].
#[derive(Clone)]
pub struct TimerHandle {
    tx: mpsc::Sender<Message>,
    state_rx: watch::Receiver<TimerState>,
    events_tx: broadcast::Sender<Event>,
}

impl TimerHandle {
    async fn request(&self, command: Command) -> Result<Vec<Event>> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Message::Command { command, reply })
            .await
            .map_err(|_| CoreError::ServiceClosed)?;
        let events = response.await.map_err(|_| CoreError::ServiceClosed)??;
        Ok(events)
    }

    pub async fn start(&self) -> Result<Vec<Event>> {
        self.request(Command::Start).await
    }

    pub async fn pause_toggle(&self) -> Result<Vec<Event>> {
        self.request(Command::PauseToggle).await
    }

    pub async fn stop(&self) -> Result<Vec<Event>> {
        self.request(Command::Stop).await
    }

    pub async fn reset(&self) -> Result<Vec<Event>> {
        self.request(Command::Reset).await
    }

    pub async fn change_mode(&self, mode: TimerMode) -> Result<Vec<Event>> {
        self.request(Command::ChangeMode(mode)).await
    }

    pub async fn select_task(&self, task_id: Option<String>) -> Result<Vec<Event>> {
        self.request(Command::SelectTask(task_id)).await
    }

    /// Latest published state.
    pub fn state(&self) -> TimerState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<TimerState> {
        self.state_rx.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    /// Ask the service task to exit. Pending commands are dropped.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Message::Shutdown).await;
    }
}
