// Single-player substitutions that keep a lineup valid.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::player::PlayerId;
use crate::pool::PlayerPool;
use crate::problem::Problem;
use crate::team::Team;

/// Replace the player in `slot` with `incoming`, a same-class player not on
/// the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swap {
    pub slot: usize,
    pub outgoing: PlayerId,
    pub incoming: PlayerId,
}

impl Swap {
    /// Projection change if the swap is applied.
    pub fn value_delta(&self, pool: &PlayerPool) -> f64 {
        pool.get(self.incoming).value - pool.get(self.outgoing).value
    }

    /// Team salary after the swap.
    pub fn cost_after(&self, team: &Team, pool: &PlayerPool) -> u64 {
        team.total_cost() - u64::from(pool.get(self.outgoing).cost)
            + u64::from(pool.get(self.incoming).cost)
    }

    pub fn apply(&self, team: &mut Team, pool: &PlayerPool) {
        let left = team.replace(self.slot, self.incoming, pool);
        debug_assert_eq!(left, Some(self.outgoing));
    }
}

/// Every feasible swap for `team`, written into `out` (cleared first).
///
/// Ordered by slot, then by pool load order, so a seeded draw is
/// reproducible.
pub fn feasible_swaps_into(team: &Team, problem: &Problem, out: &mut Vec<Swap>) {
    let pool = problem.pool();
    out.clear();
    for (slot, entry) in team.slots().iter().enumerate() {
        let Some(outgoing) = entry.player else {
            continue;
        };
        let base = team.total_cost() - u64::from(pool.get(outgoing).cost);
        for incoming in pool.available(entry.position, team.members()) {
            if problem.under_cap(base + u64::from(pool.get(incoming).cost)) {
                out.push(Swap {
                    slot,
                    outgoing,
                    incoming,
                });
            }
        }
    }
}

pub fn feasible_swaps(team: &Team, problem: &Problem) -> Vec<Swap> {
    let mut swaps = Vec::new();
    feasible_swaps_into(team, problem, &mut swaps);
    swaps
}

/// Draw one feasible swap uniformly at random.
///
/// Returns `None` when the lineup is locally rigid (no swap keeps it under
/// the cap). The annealer counts that step as skipped.
pub fn random_swap<R: Rng + ?Sized>(
    team: &Team,
    problem: &Problem,
    rng: &mut R,
    scratch: &mut Vec<Swap>,
) -> Option<Swap> {
    feasible_swaps_into(team, problem, scratch);
    scratch.choose(rng).copied()
}
