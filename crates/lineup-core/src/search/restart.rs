// Strategy A: independent random builds, keep whatever scores best.

use crate::builder::TeamBuilder;
use crate::error::OptimizerError;

use super::{collect_jobs, stream_rng, SearchConfig, SearchStrategy, StrategyOutcome};

/// Unguided baseline: `restarts` independent builds, one seeded stream each.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRestart;

impl SearchStrategy for RandomRestart {
    fn name(&self) -> &'static str {
        "random restart"
    }

    fn search(
        &self,
        builder: &TeamBuilder<'_>,
        config: &SearchConfig,
        seed: u64,
    ) -> Result<StrategyOutcome, OptimizerError> {
        let (teams, failed_builds) = collect_jobs(
            config.restarts,
            config.parallel,
            config.max_failed_builds,
            |index| {
                let mut rng = stream_rng(seed, index as u64);
                builder.build(&mut rng)
            },
        )?;

        Ok(StrategyOutcome {
            teams,
            failed_builds,
            trials: Vec::new(),
        })
    }
}
