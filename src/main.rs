use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use practice_tracker_lib::logging::{init_logging, LogFormat};
use practice_tracker_lib::{get_engine_config, AttemptEvent, Tracker};

/// Replays an attempt log from an empty state and prints the resulting state.
#[derive(Parser)]
#[command(name = "practice-tracker", version, about)]
struct Cli {
    /// JSON array of attempt events; `-` or nothing reads stdin
    events: Option<PathBuf>,

    /// Goal topic, repeatable
    #[arg(long = "goal", value_name = "TOPIC")]
    goals: Vec<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn read_events(path: Option<&Path>) -> Result<Vec<AttemptEvent>> {
    let text = match path.filter(|p| *p != Path::new("-")) {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read events from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read events from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Events must be a JSON array of attempt events")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.json_logs { LogFormat::Json } else { LogFormat::Pretty })?;

    let events = read_events(cli.events.as_deref())?;
    tracing::info!(events = events.len(), "Replaying attempt log");

    let tracker = Tracker::new(get_engine_config().clone());
    let user = "replay";
    tracker.state_or_default(user);
    if !cli.goals.is_empty() {
        tracker.update_goals(user, cli.goals);
    }

    let started = Utc::now().timestamp_millis();
    for event in &events {
        // Events without a timestamp get the replay start time.
        let now = event.timestamp.unwrap_or(started);
        tracker.record_attempt(user, event, now);
    }

    let state = tracker.state_or_default(user);
    println!(
        "{}",
        serde_json::to_string_pretty(&state).context("Failed to serialize engine state")?
    );

    let metrics = tracker.metrics();
    tracing::info!(
        attempts = metrics.attempts_processed,
        accepted = metrics.submissions_accepted,
        skill = state.skill_score,
        "Replay finished"
    );
    Ok(())
}
