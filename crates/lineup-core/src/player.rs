// Candidate player record.

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Index of a player inside a [`PlayerPool`](crate::pool::PlayerPool).
///
/// Ids are dense (0..pool.len()) and only meaningful for the pool that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

/// A player eligible for the lineup, with salary and projected score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    /// Salary in contest dollars.
    pub cost: u32,
    /// Projected fantasy points.
    pub value: f64,
}

impl Player {
    pub fn new(name: impl Into<String>, position: Position, cost: u32, value: f64) -> Self {
        Player {
            name: name.into(),
            position,
            cost,
            value,
        }
    }
}
