//! Match simulation modules

pub mod club;
pub mod commentary;
pub mod controller;
pub mod engine;
pub mod error;
pub mod event;
pub mod participant;
pub mod pitch;
pub mod protocol;
pub mod snapshot;
pub mod state;

pub use club::{builtin_clubs, Club, Player, PlayerId};
pub use controller::{
    ControllerConfig, ControllerHandle, ControllerState, MatchController, MatchRegistry,
    WeakControllerHandle,
};
pub use engine::{Engine, PhaseOutcome, PhaseResult, ShotOutcome, Tuning};
pub use error::MatchError;
pub use event::{Event, EventKind, PlayerRef};
pub use participant::{MatchParticipant, MatchPlayer};
pub use pitch::{AttackingDirection, PitchTopology, PitchZone, ZoneTransition};
pub use protocol::{Command, Notification};
pub use snapshot::MatchSnapshot;
pub use state::{Half, Match, Score, Side};
