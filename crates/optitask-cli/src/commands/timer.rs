use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use optitask_core::notify::{notice_for_error, NotificationGlue};
use optitask_core::timer::{EventListener, TimerEngine, TimerHandle, TimerService, TimerState, TimerView};
use optitask_core::{Config, CoreError, PhaseDurations, SessionRecorder, TimerMode};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tracing::{debug, warn};

use super::{runtime, CliResult, Store};
use crate::terminal::TerminalNotifier;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the interactive timer (type `help` once started)
    Run {
        /// Starting mode; defaults to `default_mode` from the config
        #[arg(long)]
        mode: Option<TimerMode>,
        /// Task to attribute work sessions to
        #[arg(long)]
        task: Option<String>,
    },
}

const HELP: &str = "\
commands:
  start                       start or resume the timer
  pause                       pause / resume
  stop                        end the current phase
  reset                       back to work, clears the pomodoro count
  mode <pomodoro|stopwatch>   switch mode
  task <id|none>              choose the task for work sessions
  status                      show the timer
  help                        this text
  quit                        leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Start,
    Pause,
    Stop,
    Reset,
    Mode(TimerMode),
    Task(Option<String>),
    Status,
    Help,
    Quit,
}

/// Parse one REPL line. `Ok(None)` for a blank line.
fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let input = match (command.to_ascii_lowercase().as_str(), arg) {
        ("start" | "s", None) => Input::Start,
        ("pause" | "p" | "resume", None) => Input::Pause,
        ("stop", None) => Input::Stop,
        ("reset", None) => Input::Reset,
        ("mode", Some(mode)) => Input::Mode(mode.parse()?),
        ("task", Some("none" | "-")) => Input::Task(None),
        ("task", Some(id)) => Input::Task(Some(id.to_string())),
        ("status" | "st", None) => Input::Status,
        ("help" | "?", None) => Input::Help,
        ("quit" | "exit" | "q", None) => Input::Quit,
        ("mode" | "task", None) => return Err(format!("{command} needs an argument")),
        _ => return Err(format!("unknown command: {}", line.trim())),
    };
    Ok(Some(input))
}

/// Question to ask before `input` may throw away tracked work.
fn confirmation_for(input: &Input, state: &TimerState) -> Option<&'static str> {
    match input {
        Input::Reset if state.has_trackable_session() => {
            Some("Active work session. Save before resetting?")
        }
        Input::Quit if state.has_trackable_session() => {
            Some("Active work session. Save before quitting?")
        }
        Input::Mode(mode) if *mode != state.mode && state.is_active() => {
            Some("A timer session is active. Changing mode will stop the current session. Continue?")
        }
        _ => None,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn render(state: &TimerState, durations: &PhaseDurations) -> String {
    let view = TimerView::from(state, durations);
    let task = view.task_id.as_deref().unwrap_or("none");
    let mut out = format!(
        "{}  {}  ({})\n{}\ntask: {task}",
        view.label, view.clock, view.run_state, view.hint
    );
    if view.mode == TimerMode::Pomodoro {
        out.push_str(&format!(
            " | cycle: {} | completed: {}",
            view.cycle_progress, view.total_completed
        ));
    }
    out
}

fn prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn ask<R: AsyncRead + Unpin>(lines: &mut Lines<BufReader<R>>, question: &str) -> CliResult<bool> {
    use std::io::Write;
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.is_some_and(|answer| is_yes(&answer)))
}

struct Repl {
    handle: TimerHandle,
    durations: PhaseDurations,
    glue: NotificationGlue,
}

impl Repl {
    /// Run one command. Returns `false` when the loop should end.
    async fn dispatch<R: AsyncRead + Unpin>(
        &self,
        input: Input,
        lines: &mut Lines<BufReader<R>>,
    ) -> CliResult<bool> {
        let state = self.handle.state();
        if let Some(question) = confirmation_for(&input, &state) {
            let yes = ask(lines, question).await?;
            match input {
                Input::Reset | Input::Quit if yes => {
                    self.command(self.handle.stop().await)?;
                }
                Input::Mode(_) if !yes => return Ok(true),
                _ => {}
            }
        }

        match input {
            Input::Start => self.command(self.handle.start().await)?,
            Input::Pause => self.command(self.handle.pause_toggle().await)?,
            Input::Stop => self.command(self.handle.stop().await)?,
            Input::Reset => self.command(self.handle.reset().await)?,
            Input::Mode(mode) => self.command(self.handle.change_mode(mode).await)?,
            Input::Task(task) => {
                self.command(self.handle.select_task(task).await)?;
                let state = self.handle.state();
                println!("task: {}", state.selected_task_id.as_deref().unwrap_or("none"));
            }
            Input::Status => println!("{}", render(&self.handle.state(), &self.durations)),
            Input::Help => println!("{HELP}"),
            Input::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Rejected commands become notices; anything else ends the session.
    fn command<T>(&self, result: Result<T, CoreError>) -> CliResult {
        match result {
            Ok(_) => Ok(()),
            Err(CoreError::Timer(err)) => {
                let mode = self.handle.state().mode;
                self.glue.deliver(notice_for_error(&err, mode));
                Ok(())
            }
            Err(other) => Err(other.into()),
        }
    }
}

async fn run_repl(config: Config, mode: Option<TimerMode>, task: Option<String>) -> CliResult {
    let durations = config.durations()?;
    let store = Store::from_config(&config.api)?;
    let store_offline = store.is_offline();
    if store_offline {
        eprintln!("note: api.base_url is not set; time entries are kept in memory for this run");
    }

    let glue = NotificationGlue::new(Arc::new(TerminalNotifier::new()), config.notifications.clone());
    let recorder = SessionRecorder::new(Arc::new(store), glue.clone());
    let saves = recorder.clone();
    let listeners: Vec<Box<dyn EventListener>> = vec![Box::new(glue.clone()), Box::new(recorder)];

    let mode = mode.unwrap_or(config.default_mode);
    debug!(%mode, offline = store_offline, "starting timer");
    let engine = TimerEngine::new(mode, durations);
    let (handle, service) = TimerService::spawn(engine, listeners);
    if task.is_some() {
        handle.select_task(task).await?;
    }

    let repl = Repl {
        handle: handle.clone(),
        durations,
        glue,
    };
    println!("{}", render(&handle.state(), &durations));
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_input(&line) {
            Ok(Some(input)) => {
                if !repl.dispatch(input, &mut lines).await? {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => eprintln!("{message}"),
        }
    }

    handle.shutdown().await;
    service.await?;

    let pending = saves.in_flight();
    if pending > 0 {
        debug!(pending, "waiting for time entries to save");
        let limit = Duration::from_secs(config.api.timeout_secs);
        if tokio::time::timeout(limit, saves.drain()).await.is_err() {
            warn!(pending, "gave up waiting for time entries to save");
        }
    }
    Ok(())
}

pub fn run(action: TimerAction) -> CliResult {
    match action {
        TimerAction::Run { mode, task } => {
            let config = Config::load()?;
            runtime()?.block_on(run_repl(config, mode, task))
        }
    }
}
