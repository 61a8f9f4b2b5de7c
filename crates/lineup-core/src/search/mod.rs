// Search driver: configuration, seeding, strategy dispatch and reporting.

pub mod anneal;
pub mod restart;
pub mod schedule;
pub mod select;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::builder::{TeamBuilder, DEFAULT_MAX_ATTEMPTS};
use crate::error::OptimizerError;
use crate::problem::Problem;
use crate::team::{Team, TeamResult};

use self::anneal::{SimulatedAnnealing, TrialStats};
use self::restart::RandomRestart;
use self::schedule::TemperatureSchedule;
use self::select::{select, Selection, TieBreak};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    RandomRestart,
    Annealing,
}

/// Everything that controls one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub strategy: StrategyKind,
    /// Builds performed by the random-restart strategy.
    pub restarts: usize,
    /// Independent annealing runs.
    pub trials: usize,
    pub schedule: TemperatureSchedule,
    pub selection: Selection,
    pub tie_break: TieBreak,
    /// Shuffle-and-fill attempts per build before it counts as failed.
    pub max_build_attempts: usize,
    /// Failed builds tolerated before the run aborts. 0 aborts on the first.
    pub max_failed_builds: usize,
    /// Run builds/trials on the rayon pool. Results are identical either way.
    pub parallel: bool,
    /// Report each trial's best visited lineup instead of its final one.
    pub keep_best_seen: bool,
    /// Fixed seed; `None` draws one from entropy and logs it.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: StrategyKind::Annealing,
            restarts: 10_000,
            trials: 20,
            schedule: TemperatureSchedule::default(),
            selection: Selection::Best,
            tie_break: TieBreak::FirstFound,
            max_build_attempts: DEFAULT_MAX_ATTEMPTS,
            max_failed_builds: 0,
            parallel: false,
            keep_best_seen: false,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), OptimizerError> {
        match self.strategy {
            StrategyKind::RandomRestart if self.restarts == 0 => {
                return Err(OptimizerError::config("search.restarts", "must be > 0"));
            }
            StrategyKind::Annealing if self.trials == 0 => {
                return Err(OptimizerError::config("search.trials", "must be > 0"));
            }
            _ => {}
        }
        if self.max_build_attempts == 0 {
            return Err(OptimizerError::config("search.max_build_attempts", "must be > 0"));
        }
        self.schedule.validate()
    }
}

// ---------------------------------------------------------------------------
// Strategy seam
// ---------------------------------------------------------------------------

/// Lineups produced by a strategy, in build/trial order.
#[derive(Debug, Clone, Default)]
pub struct StrategyOutcome {
    pub teams: Vec<Team>,
    pub failed_builds: usize,
    /// Per-trial counters; empty for strategies without trials.
    pub trials: Vec<TrialStats>,
}

/// A way of searching for good lineups.
pub trait SearchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn search(
        &self,
        builder: &TeamBuilder<'_>,
        config: &SearchConfig,
        seed: u64,
    ) -> Result<StrategyOutcome, OptimizerError>;
}

impl StrategyKind {
    pub fn strategy(&self) -> Box<dyn SearchStrategy> {
        match self {
            StrategyKind::RandomRestart => Box::new(RandomRestart),
            StrategyKind::Annealing => Box::new(SimulatedAnnealing),
        }
    }
}

// ---------------------------------------------------------------------------
// Seeding and job execution
// ---------------------------------------------------------------------------

/// Independent generator for build or trial `stream` of a seeded run.
///
/// Every job owns its own stream, so results do not depend on execution
/// order or thread count.
pub fn stream_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Stream reserved for the random tie-break, past any job index.
const SELECTION_STREAM: u64 = u64::MAX;

/// Counts failed builds against the configured limit.
struct FailureTally {
    failures: usize,
    limit: usize,
}

impl FailureTally {
    /// Record a job error, or return the error that ends the run.
    ///
    /// Only sampling failures are retried. Structural infeasibility and every
    /// other error abort at once since another build cannot fix them.
    fn record(&mut self, err: OptimizerError) -> Result<(), OptimizerError> {
        let retryable = matches!(
            &err,
            OptimizerError::ConstraintUnsatisfiable { reason, .. } if !reason.is_structural()
        );
        if !retryable {
            return Err(err);
        }

        self.failures += 1;
        if self.failures > self.limit {
            warn!("build failure {} exceeds limit {}: {}", self.failures, self.limit, err);
            if self.limit == 0 {
                return Err(err);
            }
            return Err(OptimizerError::TooManyFailedBuilds {
                failures: self.failures,
                limit: self.limit,
            });
        }
        debug!("tolerating failed build {}/{}: {}", self.failures, self.limit, err);
        Ok(())
    }
}

/// Run `count` indexed jobs, keeping successes in index order.
///
/// Sequential runs stop at the first fatal error; parallel runs finish every
/// job and then apply the same policy in index order, so both report the
/// same outcome.
pub(crate) fn collect_jobs<T, F>(
    count: usize,
    parallel: bool,
    max_failures: usize,
    job: F,
) -> Result<(Vec<T>, usize), OptimizerError>
where
    T: Send,
    F: Fn(usize) -> Result<T, OptimizerError> + Sync,
{
    let mut tally = FailureTally {
        failures: 0,
        limit: max_failures,
    };
    let mut done = Vec::with_capacity(count);

    if parallel {
        let results: Vec<Result<T, OptimizerError>> =
            (0..count).into_par_iter().map(&job).collect();
        for result in results {
            match result {
                Ok(item) => done.push(item),
                Err(e) => tally.record(e)?,
            }
        }
    } else {
        for index in 0..count {
            match job(index) {
                Ok(item) => done.push(item),
                Err(e) => tally.record(e)?,
            }
        }
    }

    Ok((done, tally.failures))
}

// ---------------------------------------------------------------------------
// Optimizer
// ---------------------------------------------------------------------------

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub strategy: StrategyKind,
    /// Seed the run used; pass it back in to reproduce the run.
    pub seed: u64,
    pub teams: Vec<TeamResult>,
    /// Lineups produced before selection.
    pub candidates: usize,
    pub failed_builds: usize,
    pub trials: Vec<TrialStats>,
}

impl SearchReport {
    /// Highest-projected reported lineup.
    pub fn best(&self) -> Option<&TeamResult> {
        self.teams
            .iter()
            .max_by(|a, b| a.total_value.total_cmp(&b.total_value))
    }
}

/// Runs a configured strategy against a validated problem.
#[derive(Debug, Clone)]
pub struct Optimizer<'p> {
    problem: &'p Problem,
    config: SearchConfig,
}

/// Largest seed drawn from entropy; TOML integers are signed 64-bit.
pub const MAX_ENTROPY_SEED: u64 = i64::MAX as u64;

impl<'p> Optimizer<'p> {
    pub fn new(problem: &'p Problem, config: SearchConfig) -> Result<Self, OptimizerError> {
        config.validate()?;
        Ok(Optimizer { problem, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the configured strategy. Without a configured seed one is drawn
    /// below `i64::MAX` so it can be written back into a TOML config.
    pub fn run(&self) -> Result<SearchReport, OptimizerError> {
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..=MAX_ENTROPY_SEED));
        self.run_with_strategy(self.config.strategy.strategy().as_ref(), seed)
    }

    /// Run an arbitrary strategy with an explicit seed.
    pub fn run_with_strategy(
        &self,
        strategy: &dyn SearchStrategy,
        seed: u64,
    ) -> Result<SearchReport, OptimizerError> {
        let builder = TeamBuilder::new(self.problem, self.config.max_build_attempts);
        if let Ok(floor) = builder.floor() {
            debug!(
                "cheapest legal lineup costs ${floor} against a ${} cap",
                self.problem.salary_cap()
            );
        }
        info!("Running {} search (seed {seed})", strategy.name());

        let outcome = strategy.search(&builder, &self.config, seed)?;

        let pool = self.problem.pool();
        let mut results = Vec::with_capacity(outcome.teams.len());
        for team in &outcome.teams {
            team.validate(pool, self.problem.requirement(), self.problem.salary_cap())
                .map_err(OptimizerError::InvalidTeam)?;
            results.push(team.to_result(pool));
        }
        let candidates = results.len();

        let mut rng = stream_rng(seed, SELECTION_STREAM);
        let teams = select(results, self.config.selection, self.config.tie_break, &mut rng);

        let report = SearchReport {
            strategy: self.config.strategy,
            seed,
            teams,
            candidates,
            failed_builds: outcome.failed_builds,
            trials: outcome.trials,
        };
        match report.best() {
            Some(best) => info!(
                "{} finished: {} lineups, best {:.2} pts for ${}",
                strategy.name(),
                candidates,
                best.total_value,
                best.total_cost
            ),
            None => warn!("{} finished without a lineup", strategy.name()),
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Infeasibility;

    #[test]
    fn default_config_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_trials_rejected_for_annealing_only() {
        let config = SearchConfig {
            trials: 0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            strategy: StrategyKind::RandomRestart,
            trials: 0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn streams_are_independent_and_reproducible() {
        let draw = |stream: u64| -> Vec<u32> {
            let mut rng = stream_rng(7, stream);
            (0..4).map(|_| rng.gen()).collect()
        };
        assert_eq!(draw(0), draw(0));
        assert_ne!(draw(0), draw(1));
    }

    fn retryable() -> OptimizerError {
        OptimizerError::ConstraintUnsatisfiable {
            attempts: 3,
            reason: Infeasibility::RetriesExhausted,
        }
    }

    #[test]
    fn tally_tolerates_up_to_limit() {
        let mut tally = FailureTally { failures: 0, limit: 2 };
        assert!(tally.record(retryable()).is_ok());
        assert!(tally.record(retryable()).is_ok());
        assert!(matches!(
            tally.record(retryable()),
            Err(OptimizerError::TooManyFailedBuilds { failures: 3, limit: 2 })
        ));
    }

    #[test]
    fn tally_with_zero_limit_passes_through_first_error() {
        let mut tally = FailureTally { failures: 0, limit: 0 };
        assert!(matches!(
            tally.record(retryable()),
            Err(OptimizerError::ConstraintUnsatisfiable { .. })
        ));
    }

    #[test]
    fn structural_failure_is_never_tolerated() {
        let mut tally = FailureTally { failures: 0, limit: 100 };
        let err = OptimizerError::ConstraintUnsatisfiable {
            attempts: 0,
            reason: Infeasibility::CapTooLow { cheapest: 15, cap: 14 },
        };
        assert!(tally.record(err).is_err());
        assert_eq!(tally.failures, 0);
    }

    #[test]
    fn collect_jobs_sequential_and_parallel_agree() {
        let job = |i: usize| {
            if i % 4 == 3 {
                Err(retryable())
            } else {
                Ok(i * 10)
            }
        };
        let seq = collect_jobs(12, false, 5, job).unwrap();
        let par = collect_jobs(12, true, 5, job).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.0, vec![0, 10, 20, 40, 50, 60, 80, 90, 100]);
        assert_eq!(seq.1, 3);
    }

    #[test]
    fn collect_jobs_aborts_past_limit() {
        let job = |_: usize| -> Result<usize, OptimizerError> { Err(retryable()) };
        assert!(matches!(
            collect_jobs(10, false, 2, job),
            Err(OptimizerError::TooManyFailedBuilds { failures: 3, limit: 2 })
        ));
        assert!(matches!(
            collect_jobs(10, true, 2, job),
            Err(OptimizerError::TooManyFailedBuilds { failures: 3, limit: 2 })
        ));
    }
}
