//! Match controller - the task that owns a match and drives it on a timer

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::util::time::{Speed, ADDED_TIME_PAUSE, GOAL_PAUSE, SHOT_PAUSE};

use super::club::PlayerId;
use super::engine::{Engine, PhaseResult};
use super::protocol::{Command, Notification};
use super::snapshot::MatchSnapshot;
use super::state::{Match, Side};

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Ticking
    Running,
    /// Ticks suspended, commands still handled
    Paused,
    /// Full time reached (or the match was abandoned)
    Done,
}

/// Settings for one controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub seed: u64,
    pub speed: Speed,
    pub command_capacity: usize,
    pub notification_capacity: usize,
    /// Side driven by the local user, if any
    pub controlled_side: Option<Side>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            speed: Speed::default(),
            command_capacity: 32,
            notification_capacity: 16,
            controlled_side: Some(Side::Home),
        }
    }
}

/// Handle to a running controller
#[derive(Clone)]
pub struct ControllerHandle {
    pub match_id: Uuid,
    command_tx: mpsc::Sender<Command>,
    speed: Arc<AtomicUsize>,
    controlled_side: Option<Side>,
}

impl ControllerHandle {
    /// Queue a command without waiting. Returns false if it was dropped.
    pub fn send(&self, cmd: Command) -> bool {
        match self.command_tx.try_send(cmd) {
            Ok(()) => true,
            Err(TrySendError::Full(cmd)) => {
                warn!(match_id = %self.match_id, command = ?cmd, "Command queue full, dropping command");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(match_id = %self.match_id, "Controller finished, command ignored");
                false
            }
        }
    }

    pub fn speed(&self) -> Speed {
        Speed::new(self.speed.load(Ordering::Relaxed))
    }

    /// Presentational label for the current speed
    pub fn speed_label(&self) -> &'static str {
        self.speed().label()
    }

    pub fn is_controlled_side(&self, side: Side) -> bool {
        self.controlled_side == Some(side)
    }

    /// True once the controller loop has exited
    pub fn is_finished(&self) -> bool {
        self.command_tx.is_closed()
    }

    /// A handle that does not keep the command queue open
    pub fn downgrade(&self) -> WeakControllerHandle {
        WeakControllerHandle {
            match_id: self.match_id,
            command_tx: self.command_tx.downgrade(),
            speed: self.speed.clone(),
            controlled_side: self.controlled_side,
        }
    }
}

/// Non-owning handle kept by the registry.
///
/// Once every [`ControllerHandle`] is dropped the controller sees its command
/// queue close, even while the match is still registered.
#[derive(Clone)]
pub struct WeakControllerHandle {
    pub match_id: Uuid,
    command_tx: mpsc::WeakSender<Command>,
    speed: Arc<AtomicUsize>,
    controlled_side: Option<Side>,
}

impl WeakControllerHandle {
    pub fn upgrade(&self) -> Option<ControllerHandle> {
        Some(ControllerHandle {
            match_id: self.match_id,
            command_tx: self.command_tx.upgrade()?,
            speed: self.speed.clone(),
            controlled_side: self.controlled_side,
        })
    }
}

/// Registry of all live matches
pub struct MatchRegistry {
    matches: DashMap<Uuid, WeakControllerHandle>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self {
            matches: DashMap::new(),
        }
    }

    /// Handle for a registered match, if anyone still holds one
    pub fn get(&self, id: &Uuid) -> Option<ControllerHandle> {
        self.matches.get(id).and_then(|m| m.value().upgrade())
    }

    pub fn insert(&self, handle: &ControllerHandle) {
        self.matches.insert(handle.match_id, handle.downgrade());
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.matches.remove(id).is_some()
    }

    pub fn active_matches(&self) -> usize {
        self.matches.len()
    }

    /// Send the same command to every live match
    pub fn broadcast(&self, cmd: &Command) -> usize {
        self.matches
            .iter()
            .filter_map(|entry| entry.value().upgrade())
            .filter(|handle| handle.send(cmd.clone()))
            .count()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns a match and is its only writer.
///
/// Ticks and commands are handled one at a time in [`MatchController::run`],
/// so a command never lands in the middle of a phase.
pub struct MatchController {
    state: Match,
    engine: Engine,
    status: ControllerState,
    speed: Speed,
    shared_speed: Arc<AtomicUsize>,
    command_rx: mpsc::Receiver<Command>,
    notification_tx: mpsc::Sender<Notification>,
    ticker: Interval,
    receiver_gone: bool,
}

impl MatchController {
    /// Create a controller for `state`
    pub fn new(
        state: Match,
        config: &ControllerConfig,
    ) -> (Self, ControllerHandle, mpsc::Receiver<Notification>) {
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity.max(1));
        let (notification_tx, notification_rx) =
            mpsc::channel(config.notification_capacity.max(1));
        let shared_speed = Arc::new(AtomicUsize::new(config.speed.index()));

        let handle = ControllerHandle {
            match_id: state.id(),
            command_tx,
            speed: shared_speed.clone(),
            controlled_side: config.controlled_side,
        };

        let controller = Self {
            state,
            engine: Engine::new(config.seed),
            status: ControllerState::Running,
            speed: config.speed,
            shared_speed,
            command_rx,
            notification_tx,
            ticker: Self::make_ticker(config.speed.period(), config.speed.period()),
            receiver_gone: false,
        };

        (controller, handle, notification_rx)
    }

    /// Run the simulation loop until full time. Returns the finished match.
    pub async fn run(mut self) -> Match {
        let match_id = self.state.id();
        info!(
            match_id = %match_id,
            home = %self.state.home().club_name,
            away = %self.state.away().club_name,
            "Kickoff"
        );

        // Initial state so the consumer has something to show
        let snapshot = self.snapshot();
        self.notify(Notification::MatchUpdate {
            snapshot,
            latest_event: None,
        })
        .await;
        self.rearm(self.speed.period());

        let mut commands_open = true;

        while self.status != ControllerState::Done && !self.receiver_gone {
            tokio::select! {
                cmd = self.command_rx.recv(), if commands_open => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => {
                        debug!(match_id = %match_id, "All command senders dropped");
                        commands_open = false;
                    }
                },
                _ = self.ticker.tick(), if self.status == ControllerState::Running => {
                    self.run_tick().await;
                }
                else => {
                    warn!(match_id = %match_id, "Paused with nobody left to resume, abandoning match");
                    break;
                }
            }
        }

        let score = self.state.score();
        info!(
            match_id = %match_id,
            home_goals = score.home,
            away_goals = score.away,
            "Match finished"
        );
        self.state
    }

    /// Resolve one minute and report it
    async fn run_tick(&mut self) {
        let events_before = self.state.events().len();
        let result = self.engine.play_phase(&mut self.state);
        log_phase(self.state.id(), &result);
        self.state.advance_minute();

        let latest_event = if self.state.events().len() > events_before {
            self.state.latest_event().cloned()
        } else {
            None
        };

        let snapshot = self.snapshot();
        self.notify(Notification::MatchUpdate {
            snapshot,
            latest_event,
        })
        .await;

        if self.state.is_half_time() {
            self.state.end_half();
            self.status = ControllerState::Paused;
            let score = self.state.score();
            info!(
                match_id = %self.state.id(),
                home_goals = score.home,
                away_goals = score.away,
                "Half time"
            );
            let snapshot = self.snapshot();
            self.notify(Notification::Halftime { snapshot }).await;
            return;
        }

        if self.state.is_full_time() {
            self.state.end_half();
            self.status = ControllerState::Done;
            let snapshot = self.snapshot();
            self.notify(Notification::Fulltime { snapshot }).await;
            return;
        }

        let hold = if result.is_goal() {
            GOAL_PAUSE
        } else if result.is_shot() {
            SHOT_PAUSE
        } else if self.state.is_in_added_time() {
            ADDED_TIME_PAUSE
        } else {
            Duration::ZERO
        };
        if hold > self.speed.period() {
            self.rearm(hold);
        }
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Pause => self.pause().await,
            Command::Resume | Command::StartMatch => self.resume().await,
            Command::TogglePause => match self.status {
                ControllerState::Running => self.pause().await,
                _ => self.resume().await,
            },
            Command::SpeedUp => self.set_speed(self.speed.faster()),
            Command::SlowDown => self.set_speed(self.speed.slower()),
            Command::Substitute {
                side,
                player_out,
                player_in,
            } => self.substitute(side, player_out, player_in).await,
        }
    }

    async fn pause(&mut self) {
        if self.status != ControllerState::Running {
            return;
        }
        self.status = ControllerState::Paused;
        info!(match_id = %self.state.id(), minute = self.state.current_minute(), "Match paused");
        let snapshot = self.snapshot();
        self.notify(Notification::MatchPaused { snapshot }).await;
    }

    async fn resume(&mut self) {
        if self.status != ControllerState::Paused {
            return;
        }
        if self.state.is_half_time() {
            self.state.start_second_half();
            info!(match_id = %self.state.id(), "Second half underway");
        }
        self.status = ControllerState::Running;
        self.rearm(self.speed.period());
        info!(match_id = %self.state.id(), minute = self.state.current_minute(), "Match resumed");
        let snapshot = self.snapshot();
        self.notify(Notification::MatchResumed { snapshot }).await;
    }

    fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
        self.shared_speed.store(speed.index(), Ordering::Relaxed);
        // Drop the old timer so nothing fires at the previous period
        self.rearm(speed.period());
        info!(
            match_id = %self.state.id(),
            speed = speed.label(),
            period_ms = speed.period().as_millis() as u64,
            "Speed changed"
        );
    }

    async fn substitute(&mut self, side: Side, player_out: PlayerId, player_in: PlayerId) {
        match self.state.substitute(side, player_out, player_in) {
            Ok(()) => {
                let team = self.state.participant(side);
                let name = |id| team.find_player(id).map(|p| p.player.name.as_str()).unwrap_or("?");
                info!(
                    match_id = %self.state.id(),
                    side = ?side,
                    player_out = name(player_out),
                    player_in = name(player_in),
                    "Substitution made"
                );
                let snapshot = self.snapshot();
                self.notify(Notification::SubstitutionMade {
                    snapshot,
                    side,
                    player_out,
                    player_in,
                })
                .await;
            }
            Err(e) => {
                warn!(match_id = %self.state.id(), side = ?side, error = %e, "Substitution rejected");
            }
        }
    }

    fn make_ticker(first_wait: Duration, period: Duration) -> Interval {
        let mut ticker = interval_at(Instant::now() + first_wait, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// Replace the timer: next tick after `first_wait`, then every period
    fn rearm(&mut self, first_wait: Duration) {
        self.ticker = Self::make_ticker(first_wait, self.speed.period());
    }

    fn snapshot(&self) -> Box<MatchSnapshot> {
        Box::new(MatchSnapshot::capture(&self.state))
    }

    /// Blocks while the queue is full
    async fn notify(&mut self, notification: Notification) {
        if self.receiver_gone {
            return;
        }
        if self.notification_tx.send(notification).await.is_err() {
            warn!(match_id = %self.state.id(), "Notification receiver dropped, abandoning match");
            self.receiver_gone = true;
        }
    }
}

fn log_phase(match_id: Uuid, result: &PhaseResult) {
    debug!(
        match_id = %match_id,
        minute = result.minute,
        home_power = result.home_power,
        away_power = result.away_power,
        power_diff = result.power_diff,
        possession = ?result.possession,
        outcome = ?result.outcome,
        "Phase resolved"
    );
}
