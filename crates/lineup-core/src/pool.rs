// Candidate pool: every player the optimizer may pick, indexed by class.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::error::OptimizerError;
use crate::player::{Player, PlayerId};
use crate::position::{Position, ALL_POSITIONS};

/// Immutable catalog of candidate players for one optimization run.
///
/// Shared read-only between trials; per-trial availability lives in each
/// [`Team`](crate::team::Team)'s membership set.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    players: Vec<Player>,
    by_name: HashMap<String, PlayerId>,
    by_position: HashMap<Position, Vec<PlayerId>>,
}

impl PlayerPool {
    /// Index a collection of players.
    ///
    /// Rejects duplicate names instead of letting the later record replace
    /// the earlier one, and rejects zero salaries and non-finite projections.
    pub fn load(players: impl IntoIterator<Item = Player>) -> Result<Self, OptimizerError> {
        let mut pool = PlayerPool {
            players: Vec::new(),
            by_name: HashMap::new(),
            by_position: HashMap::new(),
        };

        for player in players {
            if pool.by_name.contains_key(&player.name) {
                return Err(OptimizerError::DuplicateName { name: player.name });
            }
            if player.cost == 0 {
                return Err(OptimizerError::InvalidPlayer {
                    name: player.name,
                    reason: "salary must be greater than 0".into(),
                });
            }
            if !player.value.is_finite() {
                return Err(OptimizerError::InvalidPlayer {
                    name: player.name,
                    reason: format!("projection must be finite, got {}", player.value),
                });
            }

            let id = PlayerId(pool.players.len());
            pool.by_name.insert(player.name.clone(), id);
            pool.by_position.entry(player.position).or_default().push(id);
            pool.players.push(player);
        }

        for &pos in ALL_POSITIONS {
            debug!("pool: {} {} candidates", pool.count_at(pos), pos);
        }
        info!("Loaded {} players into candidate pool", pool.players.len());

        Ok(pool)
    }

    /// Look up a player by id.
    ///
    /// Ids come from this pool, so an out-of-range id is a caller bug and
    /// panics like slice indexing.
    pub fn get(&self, id: PlayerId) -> &Player {
        &self.players[id.0]
    }

    pub fn id_of(&self, name: &str) -> Option<PlayerId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter().enumerate().map(|(i, p)| (PlayerId(i), p))
    }

    /// All players of a class, in load order.
    pub fn ids_at(&self, position: Position) -> &[PlayerId] {
        self.by_position
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count_at(&self, position: Position) -> usize {
        self.ids_at(position).len()
    }

    /// Players of `position` that are not in `excluding`.
    pub fn available<'a>(
        &'a self,
        position: Position,
        excluding: &'a HashSet<PlayerId>,
    ) -> impl Iterator<Item = PlayerId> + 'a {
        self.ids_at(position)
            .iter()
            .copied()
            .filter(move |id| !excluding.contains(id))
    }

    /// Summed salary of the `n` cheapest players of a class, or `None` when
    /// the class has fewer than `n` players.
    pub fn cheapest_total(&self, position: Position, n: usize) -> Option<u64> {
        let ids = self.ids_at(position);
        if ids.len() < n {
            return None;
        }
        let mut costs: Vec<u32> = ids.iter().map(|&id| self.get(id).cost).collect();
        costs.sort_unstable();
        Some(costs.iter().take(n).map(|&c| u64::from(c)).sum())
    }
}
