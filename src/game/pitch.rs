//! Pitch topology - zone grid, legal ball movement and shot threat
//!
//! The pitch is a 4x5 grid. Rows run West (row 1) to East (row 4), lanes run
//! from the left wing (lane 1) to the right wing (lane 5). The grid itself is
//! orientation-neutral: transitions are tagged relative to increasing rows and
//! only become forward/backward once a team's attacking direction is known.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::MatchError;

/// Number of rows (goal to goal)
pub const PITCH_ROWS: u8 = 4;
/// Number of lanes (touchline to touchline)
pub const PITCH_LANES: u8 = 5;
/// The centre lane
pub const CENTRE_LANE: u8 = 3;

/// One cell of the pitch grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ZoneCoord", into = "ZoneCoord")]
pub struct PitchZone {
    row: u8,
    lane: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ZoneCoord {
    row: u8,
    lane: u8,
}

impl TryFrom<ZoneCoord> for PitchZone {
    type Error = MatchError;

    fn try_from(coord: ZoneCoord) -> Result<Self, Self::Error> {
        PitchZone::new(coord.row, coord.lane).ok_or(MatchError::InvalidZone {
            row: coord.row,
            lane: coord.lane,
        })
    }
}

impl From<PitchZone> for ZoneCoord {
    fn from(zone: PitchZone) -> Self {
        Self {
            row: zone.row,
            lane: zone.lane,
        }
    }
}

impl PitchZone {
    /// Kickoff spot: West-Mid Centre
    pub const KICKOFF: PitchZone = PitchZone { row: 2, lane: 3 };

    /// Zone at the given 1-based row and lane, if it lies on the grid
    pub fn new(row: u8, lane: u8) -> Option<Self> {
        if (1..=PITCH_ROWS).contains(&row) && (1..=PITCH_LANES).contains(&lane) {
            Some(Self { row, lane })
        } else {
            None
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn lane(&self) -> u8 {
        self.lane
    }

    /// Zone reached by stepping the given deltas, None if off the grid
    fn offset(&self, row_delta: i8, lane_delta: i8) -> Option<Self> {
        let row = u8::try_from(self.row as i8 + row_delta).ok()?;
        let lane = u8::try_from(self.lane as i8 + lane_delta).ok()?;
        Self::new(row, lane)
    }

    /// Human readable name, e.g. "East-Mid Left Half-Space"
    pub fn name(&self) -> String {
        let row = match self.row {
            1 => "West",
            2 => "West-Mid",
            3 => "East-Mid",
            _ => "East",
        };
        let lane = match self.lane {
            1 => "Left Wing",
            2 => "Left Half-Space",
            3 => "Centre",
            4 => "Right Half-Space",
            _ => "Right Wing",
        };
        format!("{} {}", row, lane)
    }

    /// Every zone on the grid, row by row
    pub fn all() -> impl Iterator<Item = PitchZone> {
        (1..=PITCH_ROWS)
            .flat_map(|row| (1..=PITCH_LANES).map(move |lane| PitchZone { row, lane }))
    }

    fn index(&self) -> usize {
        (self.row as usize - 1) * PITCH_LANES as usize + (self.lane as usize - 1)
    }
}

impl fmt::Display for PitchZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Which end of the grid a team is advancing toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackingDirection {
    /// Toward the high-row end (row 4)
    East,
    /// Toward the low-row end (row 1)
    West,
}

impl AttackingDirection {
    pub fn opposite(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// Movement class of a transition for a given attacking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Forward,
    Lateral,
    Backward,
}

/// Directed edge between neighbouring zones.
///
/// `attacking_value` and the three flags are relative to increasing rows;
/// use [`ZoneTransition::classify`] for a team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTransition {
    pub from: PitchZone,
    pub to: PitchZone,
    /// Row delta (positive = toward row 4)
    pub attacking_value: i8,
    pub is_forward: bool,
    pub is_lateral: bool,
    pub is_backward: bool,
}

impl ZoneTransition {
    fn between(from: PitchZone, to: PitchZone) -> Self {
        let row_delta = to.row as i8 - from.row as i8;
        Self {
            from,
            to,
            attacking_value: row_delta,
            is_forward: row_delta > 0,
            is_lateral: row_delta == 0,
            is_backward: row_delta < 0,
        }
    }

    /// Same edge walked the other way
    pub fn reversed(&self) -> Self {
        Self::between(self.to, self.from)
    }

    /// Forward/lateral/backward from the point of view of a team attacking `direction`
    pub fn classify(&self, direction: AttackingDirection) -> Movement {
        if self.is_lateral {
            return Movement::Lateral;
        }
        match (direction, self.is_forward) {
            (AttackingDirection::East, true) | (AttackingDirection::West, false) => {
                Movement::Forward
            }
            _ => Movement::Backward,
        }
    }
}

/// Base goal conversion for a shot from `zone` when attacking `direction`.
///
/// Nonlinear in distance from the target goal, scaled down away from the centre lane.
pub fn shot_threat(zone: PitchZone, direction: AttackingDirection) -> f64 {
    let distance = match direction {
        AttackingDirection::East => PITCH_ROWS + 1 - zone.row,
        AttackingDirection::West => zone.row,
    };

    let base = match distance {
        1 => 1.0,
        2 => 0.45,
        3 => 0.15,
        _ => 0.05,
    };

    let lane_modifier = match zone.lane.abs_diff(CENTRE_LANE) {
        0 => 1.0,
        1 => 0.8,
        _ => 0.55,
    };

    base * lane_modifier
}

/// Preference order between two candidate moves out of `from`.
///
/// Higher threat first, then the same lane, then the nearest lane, then the
/// lane closest to the centre. `Less` means `a` is preferred.
fn compare_candidates(
    from: PitchZone,
    a: (&ZoneTransition, f64),
    b: (&ZoneTransition, f64),
) -> Ordering {
    let (a, a_threat) = a;
    let (b, b_threat) = b;

    b_threat
        .total_cmp(&a_threat)
        .then_with(|| (b.to.lane == from.lane).cmp(&(a.to.lane == from.lane)))
        .then_with(|| a.to.lane.abs_diff(from.lane).cmp(&b.to.lane.abs_diff(from.lane)))
        .then_with(|| {
            a.to.lane
                .abs_diff(CENTRE_LANE)
                .cmp(&b.to.lane.abs_diff(CENTRE_LANE))
        })
}

/// Pick the preferred transition out of `from` among `candidates`, rating
/// each target zone with `threat`. Remaining ties go to the earliest candidate.
pub fn best_transition_by<I, F>(from: PitchZone, candidates: I, threat: F) -> Option<ZoneTransition>
where
    I: IntoIterator<Item = ZoneTransition>,
    F: Fn(PitchZone) -> f64,
{
    candidates
        .into_iter()
        .map(|t| (t, threat(t.to)))
        .min_by(|a, b| compare_candidates(from, (&a.0, a.1), (&b.0, b.1)))
        .map(|(t, _)| t)
}

/// Static directed graph over the pitch grid
#[derive(Debug, Clone)]
pub struct PitchTopology {
    transitions: Vec<Vec<ZoneTransition>>,
}

impl PitchTopology {
    /// Build the king-move adjacency graph for every zone
    pub fn new() -> Self {
        let transitions = PitchZone::all()
            .map(|from| {
                let mut edges = Vec::with_capacity(8);
                for row_delta in -1i8..=1 {
                    for lane_delta in -1i8..=1 {
                        if row_delta == 0 && lane_delta == 0 {
                            continue;
                        }
                        if let Some(to) = from.offset(row_delta, lane_delta) {
                            edges.push(ZoneTransition::between(from, to));
                        }
                    }
                }
                edges
            })
            .collect();

        Self { transitions }
    }

    /// All one-step moves out of `zone`, in a stable order
    pub fn valid_transitions(&self, zone: PitchZone) -> &[ZoneTransition] {
        &self.transitions[zone.index()]
    }

    /// Moves out of `zone` of the given class for a team attacking `direction`
    pub fn transitions_of(
        &self,
        zone: PitchZone,
        direction: AttackingDirection,
        movement: Movement,
    ) -> impl Iterator<Item = ZoneTransition> + '_ {
        self.valid_transitions(zone)
            .iter()
            .copied()
            .filter(move |t| t.classify(direction) == movement)
    }

    /// The most dangerous forward move out of `zone`, if any
    pub fn best_attacking_transition(
        &self,
        zone: PitchZone,
        direction: AttackingDirection,
    ) -> Option<ZoneTransition> {
        best_transition_by(
            zone,
            self.transitions_of(zone, direction, Movement::Forward),
            |to| shot_threat(to, direction),
        )
    }
}

impl Default for PitchTopology {
    fn default() -> Self {
        Self::new()
    }
}
