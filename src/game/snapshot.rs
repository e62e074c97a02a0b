//! Read-only match snapshots handed to presentation layers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::Event;
use super::participant::MatchPlayer;
use super::pitch::{AttackingDirection, PitchZone};
use super::state::{Half, Match, Score, Side};

/// One team as seen from outside the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub name: String,
    pub formation: String,
    pub score: u32,
    pub attacking: AttackingDirection,
    pub lineup: Vec<MatchPlayer>,
    pub bench: Vec<MatchPlayer>,
}

/// Copy of the match state at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: Uuid,
    pub minute: u32,
    pub half: Half,
    pub clock: String,
    pub home: TeamSnapshot,
    pub away: TeamSnapshot,
    pub possession: Side,
    pub active_zone: PitchZone,
    pub added_time_first: u32,
    pub added_time_second: u32,
    pub is_half_time: bool,
    pub is_full_time: bool,
    pub events: Vec<Event>,
}

impl MatchSnapshot {
    pub fn capture(m: &Match) -> Self {
        let team = |side: Side| {
            let p = m.participant(side);
            TeamSnapshot {
                name: p.club_name.clone(),
                formation: p.formation.clone(),
                score: m.goals_for(side),
                attacking: m.attacking_direction(side),
                lineup: p.starting().to_vec(),
                bench: p.bench().to_vec(),
            }
        };

        Self {
            match_id: m.id(),
            minute: m.current_minute(),
            half: m.current_half(),
            clock: clock_label(m),
            home: team(Side::Home),
            away: team(Side::Away),
            possession: m.possession(),
            active_zone: m.active_zone(),
            added_time_first: m.added_time(Half::First),
            added_time_second: m.added_time(Half::Second),
            is_half_time: m.is_half_time(),
            is_full_time: m.is_full_time(),
            events: m.events().to_vec(),
        }
    }

    pub fn score(&self) -> Score {
        Score {
            home: self.home.score,
            away: self.away.score,
        }
    }

    pub fn team(&self, side: Side) -> &TeamSnapshot {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

/// Scoreboard clock: "HT", "FT", "45+2'" in stoppage, otherwise "63'"
pub fn clock_label(m: &Match) -> String {
    if m.is_half_time() {
        return "HT".to_string();
    }
    if m.is_full_time() {
        return "FT".to_string();
    }
    let half = m.current_half();
    if m.is_in_added_time() {
        return format!(
            "{}+{}'",
            half.nominal_end(),
            m.current_minute() - half.nominal_end()
        );
    }
    format!("{}'", m.current_minute())
}
