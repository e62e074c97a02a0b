//! Pitchside - headless match runner
//!
//! Plays one fixture between two built-in clubs and logs the commentary:
//! - Loads `.env` and configuration from the environment
//! - Resumes automatically at half-time
//! - Prints a JSON summary at full time

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use pitchside::app::AppState;
use pitchside::config::{Config, LogFormat};
use pitchside::game::club::Club;
use pitchside::game::commentary::describe;
use pitchside::game::event::{Event, EventKind};
use pitchside::game::protocol::{Command, Notification};
use pitchside::game::snapshot::MatchSnapshot;
use pitchside::game::state::Score;

/// Final result printed to stdout
#[derive(Serialize)]
struct MatchSummary<'a> {
    match_id: Uuid,
    home: &'a str,
    away: &'a str,
    score: Score,
    added_time_first: u32,
    added_time_second: u32,
    goals: Vec<&'a Event>,
}

impl<'a> MatchSummary<'a> {
    fn from_snapshot(snapshot: &'a MatchSnapshot) -> Self {
        Self {
            match_id: snapshot.match_id,
            home: &snapshot.home.name,
            away: &snapshot.away.name,
            score: snapshot.score(),
            added_time_first: snapshot.added_time_first,
            added_time_second: snapshot.added_time_second,
            goals: snapshot
                .events
                .iter()
                .filter(|e| e.kind == EventKind::Goal)
                .collect(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level, config.log_format);

    let home = Club::builtin(&config.home_club)
        .with_context(|| format!("unknown club: {}", config.home_club))?;
    let away = Club::builtin(&config.away_club)
        .with_context(|| format!("unknown club: {}", config.away_club))?;

    info!(home = %home.name, away = %away.name, seed = config.match_seed, "Starting match runner");

    let state = AppState::new(config);
    let running = state.start_match(&home, &away)?;
    let handle = running.handle.clone();
    let mut notifications = running.notifications;

    let final_snapshot = tokio::select! {
        snapshot = async {
            let mut last = None;
            while let Some(notification) = notifications.recv().await {
                if let Notification::MatchUpdate { latest_event: Some(event), snapshot } = &notification {
                    let line = describe(event, snapshot);
                    info!(clock = %event.clock(), side = ?line.side, "{}", line.message);
                }
                match notification {
                    Notification::Halftime { snapshot } => {
                        info!(score = ?snapshot.score(), "Half time");
                        handle.send(Command::TogglePause);
                    }
                    Notification::Fulltime { snapshot } => {
                        last = Some(snapshot);
                    }
                    _ => {}
                }
            }
            last
        } => snapshot,
        _ = shutdown_signal() => {
            handle.send(Command::Pause);
            None
        }
    };

    match final_snapshot {
        Some(snapshot) => {
            let summary = MatchSummary::from_snapshot(&snapshot);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            let finished = running.task.await?;
            info!(events = finished.events().len(), "Match runner finished");
        }
        None => warn!("Match stopped before full time"),
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str, format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Ctrl+C / SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping match");
        }
        _ = terminate => {
            info!("Received terminate signal, stopping match");
        }
    }
}
