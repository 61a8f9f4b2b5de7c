// Randomized greedy lineup construction.
//
// Slots are filled in a shuffled order: whichever classes come first see the
// whole budget, later ones are squeezed by what is left, so shuffling spreads
// the budget pressure across classes from one build to the next.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{Infeasibility, OptimizerError};
use crate::player::PlayerId;
use crate::problem::Problem;
use crate::team::Team;

/// Default bound on shuffle-and-fill attempts per build.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Builds valid lineups from scratch for one problem.
#[derive(Debug, Clone)]
pub struct TeamBuilder<'p> {
    problem: &'p Problem,
    max_attempts: usize,
    /// Cheapest legal lineup cost, or why no lineup exists at all.
    floor: Result<u64, Infeasibility>,
}

impl<'p> TeamBuilder<'p> {
    pub fn new(problem: &'p Problem, max_attempts: usize) -> Self {
        TeamBuilder {
            problem,
            max_attempts,
            floor: cheapest_lineup(problem),
        }
    }

    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    /// Cost of the cheapest lineup the roster allows, or the structural
    /// reason none exists.
    pub fn floor(&self) -> Result<u64, &Infeasibility> {
        self.floor.as_ref().copied()
    }

    /// Build one valid lineup, retrying the whole shuffle-and-fill up to
    /// `max_attempts` times.
    ///
    /// Setups that can never succeed (cap below the cheapest lineup, too few
    /// players in a class) fail immediately with zero attempts.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Team, OptimizerError> {
        if let Err(reason) = &self.floor {
            return Err(OptimizerError::ConstraintUnsatisfiable {
                attempts: 0,
                reason: reason.clone(),
            });
        }

        for attempt in 1..=self.max_attempts {
            if let Some(team) = self.try_build(rng) {
                if attempt > 1 {
                    debug!("built lineup after {attempt} attempts");
                }
                return Ok(team);
            }
        }

        Err(OptimizerError::ConstraintUnsatisfiable {
            attempts: self.max_attempts,
            reason: Infeasibility::RetriesExhausted,
        })
    }

    /// One shuffle-and-fill pass. Returns `None` as soon as a slot has no
    /// candidate that keeps the running salary under the cap.
    pub fn try_build<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Team> {
        let pool = self.problem.pool();
        let mut team = Team::empty(self.problem.requirement());

        let mut order: Vec<usize> = (0..team.slots().len()).collect();
        order.shuffle(rng);

        let mut candidates: Vec<PlayerId> = Vec::new();
        for slot in order {
            let position = team.slots()[slot].position;
            let spent = team.total_cost();
            candidates.clear();
            candidates.extend(
                pool.available(position, team.members())
                    .filter(|&id| self.problem.under_cap(spent + u64::from(pool.get(id).cost))),
            );

            let &pick = candidates.choose(rng)?;
            team.fill(slot, pick, pool);
        }

        Some(team)
    }
}

fn cheapest_lineup(problem: &Problem) -> Result<u64, Infeasibility> {
    let pool = problem.pool();
    let mut total = 0u64;
    for (position, required) in problem.requirement().positions() {
        match pool.cheapest_total(position, required) {
            Some(cost) => total += cost,
            None => {
                return Err(Infeasibility::ClassExhausted {
                    position,
                    available: pool.count_at(position),
                    required,
                })
            }
        }
    }
    if !problem.under_cap(total) {
        return Err(Infeasibility::CapTooLow {
            cheapest: total,
            cap: problem.salary_cap(),
        });
    }
    Ok(total)
}
