//! Match precondition errors

use uuid::Uuid;

/// Violations of match construction and lineup preconditions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("Club {club} has no players")]
    NoPlayers { club: String },

    #[error("Club {club} has no outfield players in its starting lineup")]
    NoOutfieldStarters { club: String },

    #[error("Player {0} is not in the starting lineup")]
    PlayerNotInLineup(Uuid),

    #[error("Player {0} is not on the bench")]
    PlayerNotOnBench(Uuid),

    #[error("Zone ({row}, {lane}) is outside the pitch")]
    InvalidZone { row: u8, lane: u8 },
}
