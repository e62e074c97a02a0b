//! Application state shared by everything that starts or steers matches

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::game::club::Club;
use crate::game::controller::{ControllerConfig, ControllerHandle, MatchController, MatchRegistry};
use crate::game::error::MatchError;
use crate::game::participant::MatchParticipant;
use crate::game::protocol::Notification;
use crate::game::state::Match;

/// A spawned match: its command handle, notification stream and task
pub struct RunningMatch {
    pub handle: ControllerHandle,
    pub notifications: mpsc::Receiver<Notification>,
    /// Resolves to the finished match once the controller exits
    pub task: JoinHandle<Match>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub match_registry: Arc<MatchRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            match_registry: Arc::new(MatchRegistry::new()),
        }
    }

    /// Start a fixture with the configured controller settings
    pub fn start_match(&self, home: &Club, away: &Club) -> Result<RunningMatch, MatchError> {
        self.start_match_with(home, away, self.config.controller_config())
    }

    pub fn start_match_with(
        &self,
        home: &Club,
        away: &Club,
        controller_config: ControllerConfig,
    ) -> Result<RunningMatch, MatchError> {
        let fixture = Match::new(
            MatchParticipant::from_club(home)?,
            MatchParticipant::from_club(away)?,
        );
        let (controller, handle, notifications) = MatchController::new(fixture, &controller_config);
        let match_id = handle.match_id;

        self.match_registry.insert(&handle);
        info!(
            match_id = %match_id,
            home = %home.name,
            away = %away.name,
            seed = controller_config.seed,
            "Match created"
        );

        let registry = self.match_registry.clone();
        let task = tokio::spawn(async move {
            let finished = controller.run().await;

            registry.remove(&match_id);
            info!(match_id = %match_id, "Match removed from registry");
            finished
        });

        Ok(RunningMatch {
            handle,
            notifications,
            task,
        })
    }
}
