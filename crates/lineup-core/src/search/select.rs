// Picking what to report from the lineups a strategy produced.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::team::TeamResult;

/// Projection totals closer than this are treated as a tie.
pub const VALUE_TOLERANCE: f64 = 1e-9;

/// Report every lineup or only the best one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    #[default]
    Best,
    All,
}

/// How to choose among lineups with the same best projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The earliest build or trial wins.
    #[default]
    FirstFound,
    /// The cheapest tied lineup wins, then the earliest.
    LowestCost,
    /// Uniformly random among the tied lineups.
    Random,
}

/// Index of the best result, or `None` for an empty slice.
pub fn best_index<R: Rng + ?Sized>(
    results: &[TeamResult],
    tie_break: TieBreak,
    rng: &mut R,
) -> Option<usize> {
    let top = results
        .iter()
        .map(|r| r.total_value)
        .fold(f64::NEG_INFINITY, f64::max);

    let tied: Vec<usize> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| top - r.total_value <= VALUE_TOLERANCE)
        .map(|(i, _)| i)
        .collect();

    match tie_break {
        TieBreak::FirstFound => tied.first().copied(),
        TieBreak::LowestCost => tied
            .iter()
            .copied()
            .min_by_key(|&i| (results[i].total_cost, i)),
        TieBreak::Random => tied.choose(rng).copied(),
    }
}

/// Apply the selection policy, keeping discovery order for `All`.
pub fn select<R: Rng + ?Sized>(
    results: Vec<TeamResult>,
    selection: Selection,
    tie_break: TieBreak,
    rng: &mut R,
) -> Vec<TeamResult> {
    match selection {
        Selection::All => results,
        Selection::Best => match best_index(&results, tie_break, rng) {
            Some(i) => results.into_iter().skip(i).take(1).collect(),
            None => Vec::new(),
        },
    }
}
