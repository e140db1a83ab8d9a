use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Subcommand;
use optitask_core::persistence::API_TIMESTAMP_FORMAT;
use optitask_core::timer::format_clock;
use optitask_core::{Config, HttpTimeEntryStore, TimeEntry, TimeEntryFilter, TimeEntryStore};
use tracing::debug;
use uuid::Uuid;

use super::{runtime, CliResult};

#[derive(Subcommand)]
pub enum EntriesAction {
    /// List saved time entries
    List {
        /// Only entries for this task
        #[arg(long)]
        task: Option<String>,
        /// Entries starting at or after this date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        #[arg(long, value_parser = parse_from)]
        from: Option<NaiveDateTime>,
        /// Entries starting at or before this date (a bare date includes the whole day)
        #[arg(long, value_parser = parse_to)]
        to: Option<NaiveDateTime>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a time entry
    Delete {
        /// Entry ID
        id: Uuid,
    },
}

fn parse_date(value: &str, day_time: NaiveTime) -> Result<NaiveDateTime, String> {
    if let Ok(at) = NaiveDateTime::parse_from_str(value, API_TIMESTAMP_FORMAT) {
        return Ok(at);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(day_time))
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"))
}

fn parse_from(value: &str) -> Result<NaiveDateTime, String> {
    parse_date(value, NaiveTime::MIN)
}

fn parse_to(value: &str) -> Result<NaiveDateTime, String> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    parse_date(value, end_of_day)
}

fn format_entry(entry: &TimeEntry) -> String {
    let duration = entry
        .duration_seconds
        .and_then(|secs| u64::try_from(secs).ok())
        .map(format_clock)
        .unwrap_or_else(|| "--:--".to_string());
    let kind = if entry.is_pomodoro_session {
        "pomodoro"
    } else {
        "stopwatch"
    };
    format!(
        "{}  {}  {:>8}  {:<9}  task {}",
        entry.id,
        entry.start_time.format("%Y-%m-%d %H:%M"),
        duration,
        kind,
        entry.task_id
    )
}

pub fn run(action: EntriesAction) -> CliResult {
    let config = Config::load()?;
    let store = HttpTimeEntryStore::from_config(&config.api)?;
    let rt = runtime()?;

    match action {
        EntriesAction::List {
            task,
            from,
            to,
            json,
        } => {
            let filter = TimeEntryFilter {
                task_id: task,
                date_from: from,
                date_to: to,
            };
            debug!(?filter, "listing time entries");
            let entries = rt.block_on(store.list(filter))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("no time entries");
            } else {
                for entry in &entries {
                    println!("{}", format_entry(entry));
                }
            }
        }
        EntriesAction::Delete { id } => {
            rt.block_on(store.delete(id))?;
            println!("Time entry deleted: {id}");
        }
    }
    Ok(())
}
