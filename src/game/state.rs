//! Match aggregate and time model
//!
//! Two halves, each ending once the minute passes its nominal end (45 or
//! 90) plus the stoppage accrued by qualifying events logged in that half.
//! There is no separate added-time phase.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::club::PlayerId;
use super::error::MatchError;
use super::event::{Event, EventKind, PlayerRef};
use super::participant::{MatchParticipant, MatchPlayer};
use super::pitch::{AttackingDirection, PitchZone};

/// Home or away; used instead of participant identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    First,
    Second,
}

impl Half {
    /// First minute of the half's nominal window
    pub fn nominal_start(self) -> u32 {
        match self {
            Self::First => 1,
            Self::Second => 46,
        }
    }

    /// Last minute of the half's nominal window
    pub fn nominal_end(self) -> u32 {
        match self {
            Self::First => 45,
            Self::Second => 90,
        }
    }
}

/// Derived scoreline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn total(&self) -> u32 {
        self.home + self.away
    }
}

/// A single fixture being played.
///
/// Only the engine and the half transitions mutate it; everything outside
/// the crate reads it through accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    id: Uuid,
    home: MatchParticipant,
    away: MatchParticipant,
    possession: Side,
    current_minute: u32,
    current_half: Half,
    active_zone: PitchZone,
    home_direction: AttackingDirection,
    events: Vec<Event>,
}

impl Match {
    /// Set up kickoff: home in possession at West-Mid Centre, attacking East
    pub fn new(home: MatchParticipant, away: MatchParticipant) -> Self {
        let mut m = Self {
            id: Uuid::new_v4(),
            home,
            away,
            possession: Side::Home,
            current_minute: 1,
            current_half: Half::First,
            active_zone: PitchZone::KICKOFF,
            home_direction: AttackingDirection::East,
            events: Vec::new(),
        };
        m.record_event(EventKind::HalfStarts, Side::Home, None);
        m
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn participant(&self, side: Side) -> &MatchParticipant {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub(crate) fn participant_mut(&mut self, side: Side) -> &mut MatchParticipant {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    pub fn home(&self) -> &MatchParticipant {
        &self.home
    }

    pub fn away(&self) -> &MatchParticipant {
        &self.away
    }

    pub fn possession(&self) -> Side {
        self.possession
    }

    pub fn current_minute(&self) -> u32 {
        self.current_minute
    }

    pub fn current_half(&self) -> Half {
        self.current_half
    }

    pub fn active_zone(&self) -> PitchZone {
        self.active_zone
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn latest_event(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Direction `side` attacks in the current half
    pub fn attacking_direction(&self, side: Side) -> AttackingDirection {
        match side {
            Side::Home => self.home_direction,
            Side::Away => self.home_direction.opposite(),
        }
    }

    /// Direction of the team on the ball
    pub fn possession_direction(&self) -> AttackingDirection {
        self.attacking_direction(self.possession)
    }

    pub(crate) fn set_possession(&mut self, side: Side) {
        self.possession = side;
    }

    pub(crate) fn set_active_zone(&mut self, zone: PitchZone) {
        self.active_zone = zone;
    }

    /// Log an event at the current minute and half
    pub fn record_event(&mut self, kind: EventKind, side: Side, player: Option<PlayerRef>) {
        self.events.push(Event {
            kind,
            minute: self.current_minute,
            half: self.current_half,
            side,
            player,
        });
    }

    pub(crate) fn advance_minute(&mut self) {
        self.current_minute += 1;
    }

    /// Switch ends and restart the clock so the next tick reads 46
    pub fn start_second_half(&mut self) {
        self.current_half = Half::Second;
        self.current_minute = 45;
        self.home_direction = AttackingDirection::West;
        self.active_zone = PitchZone::KICKOFF;
        self.possession = Side::Away;
        self.record_event(EventKind::HalfStarts, Side::Away, None);
    }

    /// Log the end of the current half.
    ///
    /// Called once the clock has already moved past the final minute, so the
    /// event is stamped with the last minute actually played.
    pub(crate) fn end_half(&mut self) {
        self.events.push(Event {
            kind: EventKind::HalfEnds,
            minute: self.current_minute.saturating_sub(1),
            half: self.current_half,
            side: self.possession,
            player: None,
        });
    }

    /// Stoppage minutes for `half`, recomputed from the log on every call
    pub fn added_time(&self, half: Half) -> u32 {
        let window = half.nominal_start()..=half.nominal_end();
        self.events
            .iter()
            .filter(|e| e.half == half && window.contains(&e.minute) && e.kind.adds_stoppage())
            .count() as u32
    }

    pub fn is_half_time(&self) -> bool {
        self.current_half == Half::First
            && self.current_minute > Half::First.nominal_end() + self.added_time(Half::First)
    }

    pub fn is_full_time(&self) -> bool {
        self.current_half == Half::Second
            && self.current_minute > Half::Second.nominal_end() + self.added_time(Half::Second)
    }

    /// Between the nominal end of the current half and its extended end
    pub fn is_in_added_time(&self) -> bool {
        let half = self.current_half;
        let end = half.nominal_end();
        self.current_minute > end && self.current_minute <= end + self.added_time(half)
    }

    pub fn goals_for(&self, side: Side) -> u32 {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Goal && e.side == side)
            .count() as u32
    }

    /// Current score, counted from goal events
    pub fn score(&self) -> Score {
        Score {
            home: self.goals_for(Side::Home),
            away: self.goals_for(Side::Away),
        }
    }

    /// Side ahead on goals, None when level
    pub fn leader(&self) -> Option<Side> {
        let score = self.score();
        match score.home.cmp(&score.away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Random outfield starter of the team in possession
    pub(crate) fn random_scorer<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&MatchPlayer> {
        self.participant(self.possession).random_outfielder(rng)
    }

    pub(crate) fn substitute(
        &mut self,
        side: Side,
        player_out: PlayerId,
        player_in: PlayerId,
    ) -> Result<(), MatchError> {
        self.participant_mut(side).substitute(player_out, player_in)
    }
}
