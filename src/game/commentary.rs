//! Commentary lines generated from logged events

use serde::{Deserialize, Serialize};

use super::event::{Event, EventKind};
use super::snapshot::MatchSnapshot;
use super::state::{Half, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryLine {
    pub message: String,
    pub side: Side,
    pub kind: EventKind,
}

/// Describe `event` as seen in `snapshot`
pub fn describe(event: &Event, snapshot: &MatchSnapshot) -> CommentaryLine {
    let club = &snapshot.team(event.side).name;
    let player = event.player.as_ref().map(|p| p.name.as_str());

    let message = match (event.kind, player) {
        (EventKind::HalfStarts, _) => match event.half {
            Half::First => "First half starts!".to_string(),
            Half::Second => "Second half starts!".to_string(),
        },
        (EventKind::HalfEnds, _) => {
            // Score as it stood when the half ended
            let goals = |side: Side| {
                snapshot
                    .events
                    .iter()
                    .filter(|e| e.kind == EventKind::Goal && e.side == side)
                    .filter(|e| event.half == Half::Second || e.half == Half::First)
                    .count()
            };
            let (home, away) = (goals(Side::Home), goals(Side::Away));
            match event.half {
                Half::First => format!("First half ends, with the score at {}-{}", home, away),
                Half::Second => format!("Full time! It finishes {}-{}", home, away),
            }
        }
        (EventKind::Goal, Some(name)) => format!("GOAL: {} scores for {}!", name, club),
        (EventKind::Goal, None) => format!("GOAL: {} score!", club),
        (EventKind::PossessionChanged, _) => format!("{} win the ball", club),
        (EventKind::PossessionRetained, _) => format!("{} have the ball...", club),
        (EventKind::SavedShot, Some(name)) => format!("Save from {}'s effort!", name),
        (EventKind::SavedShot, None) => format!("Great save! {} denied", club),
        (EventKind::MissedShot, Some(name)) => format!("Missed shot by {}!", name),
        (EventKind::MissedShot, None) => format!("{} shoot wide!", club),
        (EventKind::YellowCard, Some(name)) => format!("Yellow card for {}", name),
        (EventKind::YellowCard, None) => "Yellow card!".to_string(),
        (EventKind::RedCard, Some(name)) => format!("RED CARD! {} is sent off!", name),
        (EventKind::RedCard, None) => "RED CARD!".to_string(),
        (EventKind::Injury, Some(name)) => format!("{} is down injured", name),
        (EventKind::Injury, None) => format!("Injury stoppage for {}", club),
    };

    CommentaryLine {
        message,
        side: event.side,
        kind: event.kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::event::PlayerRef;
    use crate::game::state::tests::sample_match;
    use uuid::Uuid;

    #[test]
    fn test_goal_line_names_scorer() {
        let mut m = sample_match();
        m.record_event(
            EventKind::Goal,
            Side::Home,
            Some(PlayerRef {
                id: Uuid::new_v4(),
                name: "Saka".to_string(),
            }),
        );
        let line = describe(m.latest_event().unwrap(), &MatchSnapshot::capture(&m));
        assert_eq!(line.message, "GOAL: Saka scores for Arsenal!");
        assert_eq!(line.side, Side::Home);
    }

    #[test]
    fn test_half_lines() {
        let mut m = sample_match();
        let kickoff = MatchSnapshot::capture(&m);
        assert_eq!(describe(&kickoff.events[0], &kickoff).message, "First half starts!");

        m.record_event(EventKind::Goal, Side::Away, None);
        m.end_half();
        m.start_second_half();
        m.record_event(EventKind::Goal, Side::Away, None);
        let snapshot = MatchSnapshot::capture(&m);
        let line = describe(&snapshot.events[2], &snapshot);
        assert_eq!(line.message, "First half ends, with the score at 0-1");
    }

    #[test]
    fn test_possession_line() {
        let mut m = sample_match();
        m.record_event(EventKind::PossessionChanged, Side::Away, None);
        let line = describe(m.latest_event().unwrap(), &MatchSnapshot::capture(&m));
        assert_eq!(line.message, "Manchester City win the ball");
    }
}
