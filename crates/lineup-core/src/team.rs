// Candidate lineup: fixed slots, running salary and projection totals.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::PlayerId;
use crate::pool::PlayerPool;
use crate::position::Position;
use crate::roster::RosterRequirement;

/// A single slot in a lineup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSlot {
    /// The class this slot accepts.
    pub position: Position,
    /// The player occupying this slot, if any.
    pub player: Option<PlayerId>,
}

/// One search state: a partially or fully filled lineup.
///
/// Salary and projection totals are updated on every fill/replace and never
/// recomputed from the slots.
#[derive(Debug, Clone)]
pub struct Team {
    slots: Vec<TeamSlot>,
    members: HashSet<PlayerId>,
    cost: u64,
    value: f64,
}

/// A broken lineup invariant, reported by [`Team::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TeamViolation {
    #[error("team has {actual} players, roster requires {expected}")]
    WrongSize { expected: usize, actual: usize },

    #[error("team has {actual} {position} players, roster requires {expected}")]
    ClassCount {
        position: Position,
        expected: usize,
        actual: usize,
    },

    #[error("{name} is in a {slot} slot but plays {actual}")]
    SlotMismatch {
        name: String,
        slot: Position,
        actual: Position,
    },

    #[error("{name} appears more than once")]
    Duplicate { name: String },

    #[error("team costs ${cost}, cap is ${cap}")]
    OverCap { cost: u64, cap: u32 },
}

impl Team {
    /// An empty lineup with one slot per required position instance.
    pub fn empty(requirement: &RosterRequirement) -> Self {
        let slots = requirement
            .slots()
            .into_iter()
            .map(|position| TeamSlot {
                position,
                player: None,
            })
            .collect();
        Team {
            slots,
            members: HashSet::new(),
            cost: 0,
            value: 0.0,
        }
    }

    pub fn slots(&self) -> &[TeamSlot] {
        &self.slots
    }

    /// Players currently on the team. Doubles as the "unavailable" set when
    /// asking the pool for candidates.
    pub fn members(&self) -> &HashSet<PlayerId> {
        &self.members
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.members.contains(&id)
    }

    pub fn total_cost(&self) -> u64 {
        self.cost
    }

    pub fn total_value(&self) -> f64 {
        self.value
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.player.is_some())
    }

    /// Player ids in slot order, skipping empty slots.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.slots.iter().filter_map(|s| s.player)
    }

    /// Put a player into an empty slot.
    ///
    /// Callers pick `id` from `pool.available(slot position, team.members())`
    /// so the class matches and the player is not already on the team.
    pub fn fill(&mut self, slot: usize, id: PlayerId, pool: &PlayerPool) {
        let player = pool.get(id);
        debug_assert!(self.slots[slot].player.is_none(), "slot {slot} already filled");
        debug_assert_eq!(self.slots[slot].position, player.position);
        debug_assert!(!self.members.contains(&id));

        self.slots[slot].player = Some(id);
        self.members.insert(id);
        self.cost += u64::from(player.cost);
        self.value += player.value;
    }

    /// Swap the occupant of a filled slot for `incoming`. Returns the player
    /// that left.
    pub fn replace(&mut self, slot: usize, incoming: PlayerId, pool: &PlayerPool) -> Option<PlayerId> {
        let outgoing = self.slots[slot].player.take()?;
        let out = pool.get(outgoing);
        self.members.remove(&outgoing);
        self.cost -= u64::from(out.cost);
        self.value -= out.value;

        self.fill(slot, incoming, pool);
        Some(outgoing)
    }

    /// Check every lineup invariant against the roster and cap.
    pub fn validate(
        &self,
        pool: &PlayerPool,
        requirement: &RosterRequirement,
        cap: u32,
    ) -> Result<(), TeamViolation> {
        let ids: Vec<PlayerId> = self.player_ids().collect();
        if ids.len() != requirement.total_slots() {
            return Err(TeamViolation::WrongSize {
                expected: requirement.total_slots(),
                actual: ids.len(),
            });
        }

        let mut seen = HashSet::new();
        for &id in &ids {
            if !seen.insert(id) {
                return Err(TeamViolation::Duplicate {
                    name: pool.get(id).name.clone(),
                });
            }
        }

        for slot in &self.slots {
            if let Some(id) = slot.player {
                let player = pool.get(id);
                if player.position != slot.position {
                    return Err(TeamViolation::SlotMismatch {
                        name: player.name.clone(),
                        slot: slot.position,
                        actual: player.position,
                    });
                }
            }
        }

        for (position, expected) in requirement.positions() {
            let actual = ids
                .iter()
                .filter(|&&id| pool.get(id).position == position)
                .count();
            if actual != expected {
                return Err(TeamViolation::ClassCount {
                    position,
                    expected,
                    actual,
                });
            }
        }

        let cost: u64 = ids.iter().map(|&id| u64::from(pool.get(id).cost)).sum();
        if cost >= u64::from(cap) {
            return Err(TeamViolation::OverCap { cost, cap });
        }

        Ok(())
    }

    /// Snapshot the lineup as names and totals.
    pub fn to_result(&self, pool: &PlayerPool) -> TeamResult {
        TeamResult {
            players: self
                .player_ids()
                .map(|id| pool.get(id).name.clone())
                .collect(),
            total_cost: self.cost,
            total_value: self.value,
        }
    }
}

/// A finished lineup as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    /// Player names in slot order.
    pub players: Vec<String>,
    pub total_cost: u64,
    pub total_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    fn pool() -> PlayerPool {
        PlayerPool::load(vec![
            Player::new("A", Position::Pitcher, 10, 5.0),
            Player::new("B", Position::Pitcher, 12, 8.0),
            Player::new("C", Position::Catcher, 5, 3.0),
            Player::new("D", Position::Catcher, 7, 4.5),
        ])
        .unwrap()
    }

    fn requirement() -> RosterRequirement {
        RosterRequirement::new([(Position::Pitcher, 1), (Position::Catcher, 1)]).unwrap()
    }

    fn id(pool: &PlayerPool, name: &str) -> PlayerId {
        pool.id_of(name).unwrap()
    }

    #[test]
    fn empty_team_has_one_slot_per_requirement() {
        let team = Team::empty(&requirement());
        assert_eq!(team.slots().len(), 2);
        assert!(!team.is_complete());
        assert_eq!(team.total_cost(), 0);
        assert_eq!(team.total_value(), 0.0);
    }

    #[test]
    fn fill_updates_running_totals() {
        let pool = pool();
        let mut team = Team::empty(&requirement());
        team.fill(0, id(&pool, "B"), &pool);
        team.fill(1, id(&pool, "C"), &pool);

        assert!(team.is_complete());
        assert_eq!(team.total_cost(), 17);
        assert!((team.total_value() - 11.0).abs() < 1e-9);
        assert!(team.contains(id(&pool, "B")));
        assert!(!team.contains(id(&pool, "A")));
    }

    #[test]
    fn replace_swaps_membership_and_totals() {
        let pool = pool();
        let mut team = Team::empty(&requirement());
        team.fill(0, id(&pool, "A"), &pool);
        team.fill(1, id(&pool, "C"), &pool);

        let outgoing = team.replace(1, id(&pool, "D"), &pool);
        assert_eq!(outgoing, Some(id(&pool, "C")));
        assert_eq!(team.total_cost(), 17);
        assert!((team.total_value() - 9.5).abs() < 1e-9);
        assert!(team.contains(id(&pool, "D")));
        assert!(!team.contains(id(&pool, "C")));
        assert_eq!(team.members().len(), 2);
    }

    #[test]
    fn replace_on_empty_slot_is_a_no_op() {
        let pool = pool();
        let mut team = Team::empty(&requirement());
        assert_eq!(team.replace(0, id(&pool, "A"), &pool), None);
        assert_eq!(team.total_cost(), 0);
    }

    #[test]
    fn validate_accepts_complete_team_under_cap() {
        let pool = pool();
        let mut team = Team::empty(&requirement());
        team.fill(0, id(&pool, "B"), &pool);
        team.fill(1, id(&pool, "C"), &pool);
        assert_eq!(team.validate(&pool, &requirement(), 25), Ok(()));
    }

    #[test]
    fn validate_cap_is_strict() {
        let pool = pool();
        let mut team = Team::empty(&requirement());
        team.fill(0, id(&pool, "B"), &pool);
        team.fill(1, id(&pool, "C"), &pool);
        assert_eq!(
            team.validate(&pool, &requirement(), 17),
            Err(TeamViolation::OverCap { cost: 17, cap: 17 })
        );
    }

    #[test]
    fn validate_rejects_incomplete_team() {
        let pool = pool();
        let mut team = Team::empty(&requirement());
        team.fill(0, id(&pool, "A"), &pool);
        assert_eq!(
            team.validate(&pool, &requirement(), 100),
            Err(TeamViolation::WrongSize {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn to_result_lists_names_in_slot_order() {
        let pool = pool();
        let mut team = Team::empty(&requirement());
        team.fill(1, id(&pool, "D"), &pool);
        team.fill(0, id(&pool, "A"), &pool);
        let result = team.to_result(&pool);
        assert_eq!(result.players, vec!["A".to_string(), "D".to_string()]);
        assert_eq!(result.total_cost, 17);
        assert!((result.total_value - 9.5).abs() < 1e-9);
    }
}
