//! Simulation engine - resolves one phase of play (about one minute)
//!
//! Each phase rolls a die per team on top of club strength. The stronger
//! roll takes the ball if it doesn't already have it; otherwise the team on
//! the ball tries to move it, and shoots when it cannot.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::event::{EventKind, PlayerRef};
use super::pitch::{best_transition_by, shot_threat, Movement, PitchTopology, PitchZone, ZoneTransition};
use super::state::{Match, Side};

/// Tuning constants for phase resolution
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Phase roll is drawn from `0..roll_sides`
    pub roll_sides: u32,
    /// Converts a target zone's threat into the power margin needed to reach it
    pub zone_progression_scaling: f64,
    /// Percent chance to take an eligible forward move
    pub forward_chance: u32,
    /// Percent chance to take an eligible lateral move
    pub lateral_chance: u32,
    /// Percent chance to take an eligible backward move
    pub backward_chance: u32,
    /// Lowest slice of the shot roll that misses the target
    pub off_target_fraction: f64,
    /// Goal probability bonus per point of power margin
    pub power_bonus_per_point: f64,
    pub max_goal_probability: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            roll_sides: 20,
            zone_progression_scaling: 2.0,
            forward_chance: 70,
            lateral_chance: 60,
            backward_chance: 40,
            off_target_fraction: 0.1,
            power_bonus_per_point: 0.02,
            max_goal_probability: 0.9,
        }
    }
}

/// How a shot ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    Goal,
    Saved,
    Missed,
}

impl ShotOutcome {
    fn event_kind(self) -> EventKind {
        match self {
            Self::Goal => EventKind::Goal,
            Self::Saved => EventKind::SavedShot,
            Self::Missed => EventKind::MissedShot,
        }
    }
}

/// What a phase produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseOutcome {
    /// The ball changed hands and dropped back
    PossessionWon { zone: PitchZone },
    /// The team on the ball moved it
    Progressed { movement: Movement, zone: PitchZone },
    /// The team on the ball was stuck and shot from `zone`
    Shot {
        zone: PitchZone,
        outcome: ShotOutcome,
        goal_probability: f64,
    },
}

/// Dice rolls and powers of one phase, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub minute: u32,
    pub home_roll: u32,
    pub away_roll: u32,
    pub home_power: u32,
    pub away_power: u32,
    pub power_diff: u32,
    pub dominant: Side,
    /// Team on the ball at the end of the phase
    pub possession: Side,
    pub outcome: PhaseOutcome,
}

impl PhaseResult {
    pub fn is_goal(&self) -> bool {
        matches!(
            self.outcome,
            PhaseOutcome::Shot {
                outcome: ShotOutcome::Goal,
                ..
            }
        )
    }

    pub fn is_shot(&self) -> bool {
        matches!(self.outcome, PhaseOutcome::Shot { .. })
    }
}

/// Runs the match simulation against a shared pitch topology
pub struct Engine {
    topology: Arc<PitchTopology>,
    tuning: Tuning,
    rng: ChaCha8Rng,
}

impl Engine {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Arc::new(PitchTopology::new()), Tuning::default(), seed)
    }

    pub fn with_tuning(topology: Arc<PitchTopology>, tuning: Tuning, seed: u64) -> Self {
        Self {
            topology,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Resolve one phase at the match's current minute
    pub fn play_phase(&mut self, m: &mut Match) -> PhaseResult {
        let home_roll = self.rng.gen_range(0..self.tuning.roll_sides);
        let away_roll = self.rng.gen_range(0..self.tuning.roll_sides);
        let home_power = m.home().strength + home_roll;
        let away_power = m.away().strength + away_roll;
        let power_diff = home_power.abs_diff(away_power);

        // Level powers favour the home side
        let dominant = if home_power < away_power {
            Side::Away
        } else {
            Side::Home
        };

        let outcome = if dominant != m.possession() {
            self.win_possession(m, dominant)
        } else {
            match self.progress_ball(m, power_diff) {
                Some(outcome) => outcome,
                None => self.attempt_shot(m, power_diff),
            }
        };

        PhaseResult {
            minute: m.current_minute(),
            home_roll,
            away_roll,
            home_power,
            away_power,
            power_diff,
            dominant,
            possession: m.possession(),
            outcome,
        }
    }

    /// Hand the ball to `side`, dropping it one step toward their own goal
    fn win_possession(&mut self, m: &mut Match, side: Side) -> PhaseOutcome {
        m.record_event(EventKind::PossessionChanged, side, None);
        m.set_possession(side);

        let direction = m.possession_direction();
        let retreats: Vec<ZoneTransition> = self
            .topology
            .transitions_of(m.active_zone(), direction, Movement::Backward)
            .collect();
        if let Some(t) = retreats.choose(&mut self.rng) {
            m.set_active_zone(t.to);
        }

        PhaseOutcome::PossessionWon {
            zone: m.active_zone(),
        }
    }

    /// Try to move the ball. None if it stayed put.
    ///
    /// A move is only available when `power_diff` covers the target zone's
    /// threat times the progression scaling.
    pub fn progress_ball(&mut self, m: &mut Match, power_diff: u32) -> Option<PhaseOutcome> {
        let direction = m.possession_direction();
        let from = m.active_zone();
        let scaling = self.tuning.zone_progression_scaling;

        let mut forward = Vec::new();
        let mut lateral = Vec::new();
        let mut backward = Vec::new();

        for t in self.topology.valid_transitions(from) {
            let required = (shot_threat(t.to, direction) * scaling) as u32;
            if power_diff < required {
                continue;
            }
            match t.classify(direction) {
                Movement::Forward => forward.push(*t),
                Movement::Lateral => lateral.push(*t),
                Movement::Backward => backward.push(*t),
            }
        }

        let chosen = if !forward.is_empty() && self.roll_percent(self.tuning.forward_chance) {
            best_transition_by(from, forward, |to| shot_threat(to, direction))
                .map(|t| (Movement::Forward, t))
        } else if !lateral.is_empty() && self.roll_percent(self.tuning.lateral_chance) {
            lateral.choose(&mut self.rng).map(|t| (Movement::Lateral, *t))
        } else if !backward.is_empty() && self.roll_percent(self.tuning.backward_chance) {
            backward.choose(&mut self.rng).map(|t| (Movement::Backward, *t))
        } else {
            None
        };

        let (movement, t) = chosen?;
        m.set_active_zone(t.to);
        Some(PhaseOutcome::Progressed {
            movement,
            zone: t.to,
        })
    }

    /// Shoot from the current zone and log the result
    pub fn attempt_shot(&mut self, m: &mut Match, power_diff: u32) -> PhaseOutcome {
        let side = m.possession();
        let zone = m.active_zone();
        let threat = shot_threat(zone, m.possession_direction());
        let power_modifier = 1.0 + power_diff as f64 * self.tuning.power_bonus_per_point;
        let goal_probability = (threat * power_modifier).min(self.tuning.max_goal_probability);

        let roll: f64 = self.rng.gen();
        let off_target = self.tuning.off_target_fraction;

        let outcome = if roll < off_target {
            ShotOutcome::Missed
        } else if (roll - off_target) / (1.0 - off_target) > goal_probability {
            ShotOutcome::Saved
        } else {
            ShotOutcome::Goal
        };

        let scorer = match outcome {
            ShotOutcome::Goal => Some(self.pick_scorer(m, side)),
            _ => None,
        };
        m.record_event(outcome.event_kind(), side, scorer);

        PhaseOutcome::Shot {
            zone,
            outcome,
            goal_probability,
        }
    }

    fn pick_scorer(&mut self, m: &Match, side: Side) -> PlayerRef {
        match m.random_scorer(&mut self.rng) {
            Some(player) => PlayerRef::from(player),
            None => {
                // Lineups are validated on construction and substitutions keep positions
                error!(match_id = %m.id(), side = ?side, "No outfield starters to credit a goal to");
                panic!("{:?} has no outfield starters", side);
            }
        }
    }

    fn roll_percent(&mut self, chance: u32) -> bool {
        self.rng.gen_range(0..100) < chance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::club::{Club, Player};
    use crate::game::participant::MatchParticipant;
    use crate::game::pitch::AttackingDirection;
    use crate::game::state::tests::sample_match;

    /// Play a whole match through both halves, the way the controller does
    fn play_full_match(engine: &mut Engine, m: &mut Match) -> Vec<(PhaseResult, PitchZone, Side)> {
        let mut phases = Vec::new();
        while !m.is_half_time() {
            let zone = m.active_zone();
            let side = m.possession();
            phases.push((engine.play_phase(m), zone, side));
            m.advance_minute();
        }
        m.end_half();
        m.start_second_half();
        while !m.is_full_time() {
            let zone = m.active_zone();
            let side = m.possession();
            phases.push((engine.play_phase(m), zone, side));
            m.advance_minute();
        }
        m.end_half();
        phases
    }

    fn club_with_strength(name: &str, strength: u32) -> Club {
        let players = (0..11).map(|i| Player::new(format!("{} {}", name, i), 15)).collect();
        Club::new(name, strength, players)
    }

    #[test]
    fn test_possession_flip_retreats_and_ends_phase() {
        let home = MatchParticipant::from_club(&club_with_strength("Weak", 0)).unwrap();
        let away = MatchParticipant::from_club(&club_with_strength("Strong", 20)).unwrap();
        let mut m = Match::new(home, away);
        let mut engine = Engine::new(1);

        let before = m.events().len();
        let zone_before = m.active_zone();
        let result = engine.play_phase(&mut m);

        // Strength 20 over 0 with 0..20 rolls always dominates
        assert_eq!(result.dominant, Side::Away);
        assert_eq!(m.possession(), Side::Away);
        assert_eq!(m.events().len(), before + 1);
        assert_eq!(m.latest_event().unwrap().kind, EventKind::PossessionChanged);
        assert_eq!(m.latest_event().unwrap().side, Side::Away);

        // Away attacks West, so dropping back means moving East
        assert!(matches!(result.outcome, PhaseOutcome::PossessionWon { .. }));
        assert_eq!(m.active_zone().row(), zone_before.row() + 1);
        assert_eq!(m.attacking_direction(Side::Away), AttackingDirection::West);
    }

    #[test]
    fn test_turnover_on_own_goal_row_keeps_zone() {
        let home = MatchParticipant::from_club(&club_with_strength("Strong", 20)).unwrap();
        let away = MatchParticipant::from_club(&club_with_strength("Weak", 0)).unwrap();
        let mut m = Match::new(home, away);
        let own_goal_row = PitchZone::new(1, 2).unwrap();
        m.set_possession(Side::Away);
        m.set_active_zone(own_goal_row);
        assert_eq!(m.attacking_direction(Side::Home), AttackingDirection::East);

        let result = Engine::new(8).play_phase(&mut m);

        assert_eq!(m.possession(), Side::Home);
        assert_eq!(result.outcome, PhaseOutcome::PossessionWon { zone: own_goal_row });
        assert_eq!(m.active_zone(), own_goal_row);
        assert_eq!(m.latest_event().unwrap().kind, EventKind::PossessionChanged);
    }

    #[test]
    fn test_one_event_per_phase_at_most() {
        let mut m = sample_match();
        let mut engine = Engine::new(99);
        for _ in 0..200 {
            let before = m.events().len();
            let result = engine.play_phase(&mut m);
            let added = m.events().len() - before;
            match result.outcome {
                PhaseOutcome::Progressed { .. } => assert_eq!(added, 0),
                _ => assert_eq!(added, 1),
            }
        }
    }

    #[test]
    fn test_shot_from_stuck_position_logs_event() {
        let mut m = sample_match();
        let mut engine = Engine::new(3);
        let outcome = engine.attempt_shot(&mut m, 5);

        let event = m.latest_event().unwrap();
        assert!(event.kind.is_shot());
        assert_eq!(event.side, Side::Home);
        match outcome {
            PhaseOutcome::Shot { outcome, goal_probability, .. } => {
                assert!(goal_probability <= 0.9);
                assert_eq!(event.player.is_some(), outcome == ShotOutcome::Goal);
            }
            other => panic!("expected a shot, got {:?}", other),
        }
    }

    #[test]
    fn test_progression_gated_by_power() {
        // With no power margin only low-threat targets are reachable
        let mut m = sample_match();
        let mut engine = Engine::new(11);
        for _ in 0..100 {
            let direction = m.possession_direction();
            if let Some(PhaseOutcome::Progressed { zone, .. }) = engine.progress_ball(&mut m, 0) {
                assert!(shot_threat(zone, direction) * 2.0 < 1.0);
            }
        }
    }

    #[test]
    fn test_same_seed_same_match() {
        let mut a = sample_match();
        let mut b = sample_match();
        play_full_match(&mut Engine::new(42), &mut a);
        play_full_match(&mut Engine::new(42), &mut b);

        let kinds = |m: &Match| m.events().iter().map(|e| (e.kind, e.minute, e.side)).collect::<Vec<_>>();
        assert_eq!(kinds(&a), kinds(&b));
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn test_full_match_scoreline_matches_log() {
        let mut m = sample_match();
        let mut engine = Engine::new(2024);
        play_full_match(&mut engine, &mut m);

        let goal_events = m.events().iter().filter(|e| e.kind == EventKind::Goal).count() as u32;
        assert_eq!(goal_events, m.score().total());
        assert!(m.score().total() <= 20);

        let half_ends = m.events().iter().filter(|e| e.kind == EventKind::HalfEnds).count();
        assert_eq!(half_ends, 2);
        for e in m.events() {
            let limit = e.half.nominal_end() + m.added_time(e.half);
            assert!(e.minute <= limit, "event {:?} past {}", e, limit);
        }
    }

    #[test]
    fn test_statistical_envelope() {
        const MATCHES: u64 = 200;
        let mut goals = 0u32;
        let mut shots = 0usize;

        for seed in 0..MATCHES {
            let mut m = sample_match();
            let mut engine = Engine::new(seed);
            play_full_match(&mut engine, &mut m);
            goals += m.score().total();
            shots += m.events().iter().filter(|e| e.kind.is_shot()).count();
        }

        let avg_goals = goals as f64 / MATCHES as f64;
        let avg_shots = shots as f64 / MATCHES as f64;
        assert!(
            (1.0..=2.5).contains(&avg_goals),
            "average goals {:.2} outside 1.0..=2.5",
            avg_goals
        );
        assert!(
            (4.0..=8.0).contains(&avg_shots),
            "average shots {:.2} outside 4.0..=8.0",
            avg_shots
        );
    }

    #[test]
    fn test_stronger_side_shoots_from_better_zones() {
        let mut threat = [0.0f64; 2];
        let mut count = [0u32; 2];

        for seed in 0..100 {
            let mut m = sample_match();
            let mut engine = Engine::new(seed);
            while !m.is_half_time() {
                let zone = m.active_zone();
                let side = m.possession();
                let direction = m.possession_direction();
                if engine.play_phase(&mut m).is_shot() {
                    let i = if side == Side::Home { 0 } else { 1 };
                    threat[i] += shot_threat(zone, direction);
                    count[i] += 1;
                }
                m.advance_minute();
            }
        }

        assert!(count[0] > 0 && count[1] > 0);
        let home_avg = threat[0] / count[0] as f64;
        let away_avg = threat[1] / count[1] as f64;
        assert!(home_avg >= away_avg, "home {:.3} away {:.3}", home_avg, away_avg);
    }
}
