//! Clubs, players and lineup positions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PlayerId = Uuid;

/// Highest strength/quality rating
pub const MAX_RATING: u32 = 20;

/// An individual player with permanent attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Out of 20
    pub quality: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, quality: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quality: quality.min(MAX_RATING),
        }
    }
}

/// A football club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    /// Out of 20, added to every phase roll
    pub strength: u32,
    pub players: Vec<Player>,
}

impl Club {
    pub fn new(name: impl Into<String>, strength: u32, players: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            strength: strength.min(MAX_RATING),
            players,
        }
    }

    /// Look up one of the built-in clubs by name
    pub fn builtin(name: &str) -> Option<Self> {
        builtin_clubs().into_iter().find(|c| c.name == name)
    }
}

/// Lineup position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    GK,
    RB,
    CB,
    LB,
    CM,
    RW,
    ST,
    LW,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GK => "GK",
            Self::RB => "RB",
            Self::CB => "CB",
            Self::LB => "LB",
            Self::CM => "CM",
            Self::RW => "RW",
            Self::ST => "ST",
            Self::LW => "LW",
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Self::GK)
    }
}

/// Formation label and the positions it assigns to the first eleven players
#[derive(Debug, Clone, Copy)]
pub struct Formation {
    pub label: &'static str,
    pub positions: [Position; 11],
}

pub const FOUR_THREE_THREE: Formation = Formation {
    label: "4-3-3",
    positions: [
        Position::GK,
        Position::RB,
        Position::CB,
        Position::CB,
        Position::LB,
        Position::CM,
        Position::CM,
        Position::CM,
        Position::RW,
        Position::ST,
        Position::LW,
    ],
};

fn squad(names: &[(&str, u32)]) -> Vec<Player> {
    names.iter().map(|(name, q)| Player::new(*name, *q)).collect()
}

/// The clubs shipped with the simulator
pub fn builtin_clubs() -> Vec<Club> {
    vec![
        Club::new(
            "Arsenal",
            20,
            squad(&[
                ("Raya", 18),
                ("Timber", 17),
                ("Saliba", 18),
                ("Gabriel", 18),
                ("Calafiori", 17),
                ("Zubimendi", 18),
                ("Rice", 19),
                ("Ødegaard", 18),
                ("Saka", 19),
                ("Gyokeres", 17),
                ("Trossard", 17),
                ("Kepa", 15),
                ("White", 16),
                ("Merino", 16),
                ("Martinelli", 17),
            ]),
        ),
        Club::new(
            "Manchester City",
            19,
            squad(&[
                ("Donnarumma", 18),
                ("Lewis", 15),
                ("Stones", 17),
                ("Ruben Dias", 18),
                ("Gvardiol", 17),
                ("González", 18),
                ("M. Nunes", 17),
                ("B. Silva", 15),
                ("Savinho", 18),
                ("Haaland", 19),
                ("Doku", 16),
                ("Trafford", 15),
                ("Aké", 16),
                ("Foden", 18),
                ("Marmoush", 17),
            ]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let arsenal = Club::builtin("Arsenal").unwrap();
        assert_eq!(arsenal.strength, 20);
        assert!(arsenal.players.len() > 11);
        assert!(Club::builtin("Nowhere FC").is_none());
    }

    #[test]
    fn test_ratings_are_capped() {
        let club = Club::new("Test", 99, vec![Player::new("A", 50)]);
        assert_eq!(club.strength, MAX_RATING);
        assert_eq!(club.players[0].quality, MAX_RATING);
    }
}
