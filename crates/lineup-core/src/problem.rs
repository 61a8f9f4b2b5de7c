// The fixed inputs of one optimization run: pool, roster requirement, cap.

use tracing::warn;

use crate::error::OptimizerError;
use crate::pool::PlayerPool;
use crate::roster::RosterRequirement;

/// Validated, read-only problem definition shared by every build and trial.
#[derive(Debug, Clone)]
pub struct Problem {
    pool: PlayerPool,
    requirement: RosterRequirement,
    salary_cap: u32,
}

impl Problem {
    /// Validate the setup. Fails when the cap is zero or a required class
    /// has no candidates at all; both abort the run before any search.
    pub fn new(
        pool: PlayerPool,
        requirement: RosterRequirement,
        salary_cap: u32,
    ) -> Result<Self, OptimizerError> {
        if salary_cap == 0 {
            return Err(OptimizerError::config("salary_cap", "must be greater than 0"));
        }

        for (position, required) in requirement.positions() {
            if pool.count_at(position) == 0 {
                warn!("roster requires {required} {position} but the pool has none");
                return Err(OptimizerError::config(
                    &format!("roster.{position}"),
                    format!("requires {required} players but the pool has no {position} candidates"),
                ));
            }
        }

        Ok(Problem {
            pool,
            requirement,
            salary_cap,
        })
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    pub fn requirement(&self) -> &RosterRequirement {
        &self.requirement
    }

    pub fn salary_cap(&self) -> u32 {
        self.salary_cap
    }

    /// Whether a lineup costing `cost` is under the (strict) cap.
    pub fn under_cap(&self, cost: u64) -> bool {
        cost < u64::from(self.salary_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::position::Position;

    fn pool() -> PlayerPool {
        PlayerPool::load(vec![
            Player::new("A", Position::Pitcher, 10, 5.0),
            Player::new("C", Position::Catcher, 5, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn zero_cap_rejected() {
        let req = RosterRequirement::new([(Position::Pitcher, 1)]).unwrap();
        let err = Problem::new(pool(), req, 0).unwrap_err();
        match err {
            OptimizerError::InvalidConfiguration { field, .. } => assert_eq!(field, "salary_cap"),
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn class_without_candidates_rejected() {
        let req = RosterRequirement::new([(Position::Pitcher, 1), (Position::ShortStop, 1)]).unwrap();
        let err = Problem::new(pool(), req, 100).unwrap_err();
        match err {
            OptimizerError::InvalidConfiguration { field, .. } => assert_eq!(field, "roster.SS"),
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn cap_comparison_is_strict() {
        let req = RosterRequirement::new([(Position::Pitcher, 1)]).unwrap();
        let problem = Problem::new(pool(), req, 15).unwrap();
        assert!(problem.under_cap(14));
        assert!(!problem.under_cap(15));
    }
}
