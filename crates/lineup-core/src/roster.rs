// Roster requirement: how many players of each class a complete lineup holds.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::OptimizerError;
use crate::position::Position;

/// Required count per position class.
///
/// Kept in a `BTreeMap` so slot expansion is deterministic, which the
/// seeded search depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRequirement {
    counts: BTreeMap<Position, usize>,
}

impl RosterRequirement {
    /// Build a requirement from a `position -> count` map.
    ///
    /// At least one count must be positive. Zero counts are dropped.
    pub fn new(counts: impl IntoIterator<Item = (Position, usize)>) -> Result<Self, OptimizerError> {
        let mut map = BTreeMap::new();
        for (pos, count) in counts {
            if count > 0 {
                *map.entry(pos).or_insert(0) += count;
            }
        }
        if map.is_empty() {
            return Err(OptimizerError::config(
                "roster",
                "at least one position must require a player",
            ));
        }
        Ok(RosterRequirement { counts: map })
    }

    /// Build a requirement from a config mapping position strings to counts,
    /// e.g. `{"P": 1, "C": 1, "OF": 3}`.
    ///
    /// Unknown keys are an error: a dropped slot would change which lineups
    /// count as valid.
    pub fn from_config(config: &HashMap<String, usize>) -> Result<Self, OptimizerError> {
        let mut counts = Vec::with_capacity(config.len());
        for (key, &count) in config {
            let pos = Position::from_str_pos(key).ok_or_else(|| {
                OptimizerError::config(&format!("roster.{key}"), "unknown position class")
            })?;
            counts.push((pos, count));
        }
        Self::new(counts)
    }

    /// The classic daily baseball lineup: P, C, 1B, 2B, SS, 3B and three OF.
    pub fn daily_baseball() -> Self {
        RosterRequirement {
            counts: [
                (Position::Pitcher, 1),
                (Position::Catcher, 1),
                (Position::FirstBase, 1),
                (Position::SecondBase, 1),
                (Position::ShortStop, 1),
                (Position::ThirdBase, 1),
                (Position::Outfield, 3),
            ]
            .into_iter()
            .collect(),
        }
    }

    pub fn count(&self, position: Position) -> usize {
        self.counts.get(&position).copied().unwrap_or(0)
    }

    /// Total slots, i.e. the team size.
    pub fn total_slots(&self) -> usize {
        self.counts.values().sum()
    }

    /// Positions with a positive requirement, in sort order.
    pub fn positions(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        self.counts.iter().map(|(&p, &c)| (p, c))
    }

    /// Expand into one entry per required slot, in deterministic order.
    pub fn slots(&self) -> Vec<Position> {
        let mut slots = Vec::with_capacity(self.total_slots());
        for (pos, count) in self.positions() {
            slots.extend(std::iter::repeat(pos).take(count));
        }
        slots
    }
}
