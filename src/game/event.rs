//! Match events - the append-only record of what happened

use serde::{Deserialize, Serialize};

use super::club::PlayerId;
use super::participant::MatchPlayer;
use super::state::{Half, Side};

/// Kind of notable moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Goal,
    SavedShot,
    MissedShot,
    YellowCard,
    RedCard,
    Injury,
    PossessionChanged,
    PossessionRetained,
    HalfStarts,
    HalfEnds,
}

impl EventKind {
    /// Each of these adds a minute of stoppage to its half
    pub fn adds_stoppage(&self) -> bool {
        matches!(self, Self::Goal | Self::Injury | Self::RedCard)
    }

    pub fn is_shot(&self) -> bool {
        matches!(self, Self::Goal | Self::SavedShot | Self::MissedShot)
    }
}

/// Player involved in an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

impl From<&MatchPlayer> for PlayerRef {
    fn from(p: &MatchPlayer) -> Self {
        Self {
            id: p.player.id,
            name: p.player.name.clone(),
        }
    }
}

/// A key moment in the match. Never changed after it is logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub minute: u32,
    pub half: Half,
    /// Team the event is attributed to
    pub side: Side,
    pub player: Option<PlayerRef>,
}

impl Event {
    /// Match clock at the moment of the event, e.g. "63'" or "45+2'"
    pub fn clock(&self) -> String {
        let end = self.half.nominal_end();
        if self.minute > end {
            format!("{}+{}'", end, self.minute - end)
        } else {
            format!("{}'", self.minute)
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.player {
            Some(p) => write!(f, "{} ({}')", p.name, self.minute),
            None => write!(f, "({}')", self.minute),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_at(minute: u32, half: Half) -> Event {
        Event {
            kind: EventKind::Goal,
            minute,
            half,
            side: Side::Home,
            player: None,
        }
    }

    #[test]
    fn test_clock_uses_event_minute() {
        assert_eq!(event_at(12, Half::First).clock(), "12'");
        assert_eq!(event_at(45, Half::First).clock(), "45'");
        assert_eq!(event_at(47, Half::First).clock(), "45+2'");
        assert_eq!(event_at(45, Half::Second).clock(), "45'");
        assert_eq!(event_at(91, Half::Second).clock(), "90+1'");
    }
}
