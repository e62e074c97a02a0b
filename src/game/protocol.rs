//! Controller message definitions
//! Commands flow in to the controller, notifications flow out

use serde::{Deserialize, Serialize};

use super::club::PlayerId;
use super::event::Event;
use super::snapshot::MatchSnapshot;
use super::state::Side;

/// Messages sent from a presentation layer to the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Pause,
    Resume,
    TogglePause,
    /// Next speed on the ladder, wrapping to the slowest
    SpeedUp,
    /// Previous speed on the ladder, wrapping to the fastest
    SlowDown,
    /// Same as resume
    StartMatch,
    /// Swap a starter for a bench player between ticks
    Substitute {
        side: Side,
        player_out: PlayerId,
        player_in: PlayerId,
    },
}

/// Messages sent from the controller to a presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// State after each simulated minute (and once at kickoff)
    MatchUpdate {
        snapshot: Box<MatchSnapshot>,
        /// Event logged this phase, if any
        latest_event: Option<Event>,
    },

    /// First half over; the controller has paused itself
    Halftime { snapshot: Box<MatchSnapshot> },

    /// Match over; no further notifications follow
    Fulltime { snapshot: Box<MatchSnapshot> },

    MatchPaused { snapshot: Box<MatchSnapshot> },

    MatchResumed { snapshot: Box<MatchSnapshot> },

    SubstitutionMade {
        snapshot: Box<MatchSnapshot>,
        side: Side,
        player_out: PlayerId,
        player_in: PlayerId,
    },
}

impl Notification {
    pub fn snapshot(&self) -> &MatchSnapshot {
        match self {
            Self::MatchUpdate { snapshot, .. }
            | Self::Halftime { snapshot }
            | Self::Fulltime { snapshot }
            | Self::MatchPaused { snapshot }
            | Self::MatchResumed { snapshot }
            | Self::SubstitutionMade { snapshot, .. } => snapshot,
        }
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::MatchUpdate { .. } => "match_update",
            Self::Halftime { .. } => "halftime",
            Self::Fulltime { .. } => "fulltime",
            Self::MatchPaused { .. } => "match_paused",
            Self::MatchResumed { .. } => "match_resumed",
            Self::SubstitutionMade { .. } => "substitution_made",
        }
    }
}
