//! A club's in-match roster view

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::club::{Club, Player, PlayerId, Position, FOUR_THREE_THREE};
use super::error::MatchError;

/// A player taking part in a specific match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPlayer {
    pub player: Player,
    /// None while on the bench
    pub position: Option<Position>,
}

impl MatchPlayer {
    pub fn id(&self) -> PlayerId {
        self.player.id
    }

    pub fn is_outfielder(&self) -> bool {
        self.position.is_some_and(|p| !p.is_goalkeeper())
    }
}

/// A club participating in a specific match.
///
/// Carries no score: goals are counted from the match event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub club_name: String,
    pub strength: u32,
    pub formation: String,
    starting: Vec<MatchPlayer>,
    bench: Vec<MatchPlayer>,
}

impl MatchParticipant {
    /// Pick a 4-3-3 from the squad; players past the eleventh go to the bench
    pub fn from_club(club: &Club) -> Result<Self, MatchError> {
        if club.players.is_empty() {
            return Err(MatchError::NoPlayers {
                club: club.name.clone(),
            });
        }

        let formation = FOUR_THREE_THREE;
        let mut starting = Vec::with_capacity(formation.positions.len());
        let mut bench = Vec::new();

        for (i, player) in club.players.iter().enumerate() {
            match formation.positions.get(i) {
                Some(position) => starting.push(MatchPlayer {
                    player: player.clone(),
                    position: Some(*position),
                }),
                None => bench.push(MatchPlayer {
                    player: player.clone(),
                    position: None,
                }),
            }
        }

        if !starting.iter().any(MatchPlayer::is_outfielder) {
            return Err(MatchError::NoOutfieldStarters {
                club: club.name.clone(),
            });
        }

        Ok(Self {
            club_name: club.name.clone(),
            strength: club.strength,
            formation: formation.label.to_string(),
            starting,
            bench,
        })
    }

    pub fn starting(&self) -> &[MatchPlayer] {
        &self.starting
    }

    pub fn bench(&self) -> &[MatchPlayer] {
        &self.bench
    }

    /// Bring `player_in` off the bench for `player_out`.
    ///
    /// The substitute takes over the outgoing player's position; the outgoing
    /// player goes to the end of the bench without one.
    pub fn substitute(&mut self, player_out: PlayerId, player_in: PlayerId) -> Result<(), MatchError> {
        let out_idx = self
            .starting
            .iter()
            .position(|p| p.id() == player_out)
            .ok_or(MatchError::PlayerNotInLineup(player_out))?;
        let in_idx = self
            .bench
            .iter()
            .position(|p| p.id() == player_in)
            .ok_or(MatchError::PlayerNotOnBench(player_in))?;

        let mut incoming = self.bench.remove(in_idx);
        incoming.position = self.starting[out_idx].position;

        let mut outgoing = std::mem::replace(&mut self.starting[out_idx], incoming);
        outgoing.position = None;
        self.bench.push(outgoing);

        Ok(())
    }

    /// A uniformly chosen non-goalkeeper starter
    pub fn random_outfielder<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&MatchPlayer> {
        let outfielders: Vec<&MatchPlayer> =
            self.starting.iter().filter(|p| p.is_outfielder()).collect();
        outfielders.choose(rng).copied()
    }

    /// Starters sharing the highest quality rating
    pub fn star_players(&self) -> Vec<&MatchPlayer> {
        let best = self
            .starting
            .iter()
            .map(|p| p.player.quality)
            .max()
            .unwrap_or(0);
        self.starting
            .iter()
            .filter(|p| p.player.quality == best)
            .collect()
    }

    pub fn average_quality(&self) -> f64 {
        if self.starting.is_empty() {
            return 0.0;
        }
        let total: u32 = self.starting.iter().map(|p| p.player.quality).sum();
        total as f64 / self.starting.len() as f64
    }

    pub fn find_player(&self, id: PlayerId) -> Option<&MatchPlayer> {
        self.starting
            .iter()
            .chain(self.bench.iter())
            .find(|p| p.id() == id)
    }
}
