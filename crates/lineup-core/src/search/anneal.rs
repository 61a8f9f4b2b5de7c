// Strategy B: simulated annealing over same-class swaps.
//
// Each trial starts from a freshly built lineup and walks the temperature
// schedule once, proposing one random feasible swap per step. Improvements
// are always taken; losses are taken with the Metropolis probability
// exp(-loss / T), which vanishes as T approaches zero.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::builder::TeamBuilder;
use crate::error::OptimizerError;
use crate::neighbors::{random_swap, Swap};
use crate::team::Team;

use super::schedule::TemperatureSchedule;
use super::{collect_jobs, stream_rng, SearchConfig, SearchStrategy, StrategyOutcome};

/// Counters for a single annealing trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrialStats {
    pub trial: usize,
    pub initial_value: f64,
    pub final_value: f64,
    /// Best projection seen at any step, including the start.
    pub best_value: f64,
    pub steps: usize,
    pub accepted_improving: usize,
    pub accepted_worsening: usize,
    /// Accepted swaps that left the projection unchanged.
    pub accepted_neutral: usize,
    pub rejected: usize,
    /// Steps where the lineup had no feasible swap.
    pub skipped: usize,
}

/// Metropolis acceptance test.
///
/// Strict improvements always pass. Otherwise a fresh uniform sample in
/// [0, 1) is compared against `exp(-(current - candidate) / temperature)`.
/// At zero temperature nothing but a strict improvement passes.
pub fn accept<R: Rng + ?Sized>(current: f64, candidate: f64, temperature: f64, rng: &mut R) -> bool {
    if candidate > current {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    let loss = current - candidate;
    let probability = (-loss / temperature).exp();
    rng.gen::<f64>() < probability
}

/// Run one annealing trial from a freshly built lineup.
///
/// Returns the terminal lineup, or the best lineup visited when
/// `keep_best_seen` is set.
pub fn run_trial<R: Rng + ?Sized>(
    builder: &TeamBuilder<'_>,
    schedule: &TemperatureSchedule,
    keep_best_seen: bool,
    trial: usize,
    rng: &mut R,
) -> Result<(Team, TrialStats), OptimizerError> {
    let problem = builder.problem();
    let pool = problem.pool();

    let mut current = builder.build(rng)?;
    let mut best: Option<Team> = keep_best_seen.then(|| current.clone());
    let mut stats = TrialStats {
        trial,
        initial_value: current.total_value(),
        best_value: current.total_value(),
        ..TrialStats::default()
    };
    let mut scratch: Vec<Swap> = Vec::new();

    for temperature in schedule.temperatures() {
        stats.steps += 1;

        let Some(swap) = random_swap(&current, problem, rng, &mut scratch) else {
            stats.skipped += 1;
            continue;
        };

        let current_value = current.total_value();
        let candidate_value = current_value + swap.value_delta(pool);
        if !accept(current_value, candidate_value, temperature, rng) {
            stats.rejected += 1;
            continue;
        }

        if candidate_value > current_value {
            stats.accepted_improving += 1;
        } else if candidate_value < current_value {
            stats.accepted_worsening += 1;
        } else {
            stats.accepted_neutral += 1;
        }
        swap.apply(&mut current, pool);

        if current.total_value() > stats.best_value {
            stats.best_value = current.total_value();
            if keep_best_seen {
                best = Some(current.clone());
            }
        }
    }

    stats.final_value = current.total_value();
    debug!(
        "trial {}: {:.2} -> {:.2} (best {:.2}), {} up / {} down / {} flat / {} rejected / {} skipped",
        trial,
        stats.initial_value,
        stats.final_value,
        stats.best_value,
        stats.accepted_improving,
        stats.accepted_worsening,
        stats.accepted_neutral,
        stats.rejected,
        stats.skipped
    );

    Ok((best.unwrap_or(current), stats))
}

/// Independent annealing trials, one seeded stream per trial.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAnnealing;

impl SearchStrategy for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "simulated annealing"
    }

    fn search(
        &self,
        builder: &TeamBuilder<'_>,
        config: &SearchConfig,
        seed: u64,
    ) -> Result<StrategyOutcome, OptimizerError> {
        let (finished, failed_builds) = collect_jobs(
            config.trials,
            config.parallel,
            config.max_failed_builds,
            |trial| {
                let mut rng = stream_rng(seed, trial as u64);
                run_trial(builder, &config.schedule, config.keep_best_seen, trial, &mut rng)
            },
        )?;

        let (teams, trials) = finished.into_iter().unzip();
        Ok(StrategyOutcome {
            teams,
            failed_builds,
            trials,
        })
    }
}
