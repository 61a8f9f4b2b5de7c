// Library root: configuration and player-data loading around the optimizer,
// exposed so integration tests can drive the same pipeline as the binary.

pub mod config;
pub mod players;

use anyhow::Context;
use lineup_core::{Optimizer, PlayerPool, Problem, SearchReport};
use tracing::info;

use crate::config::Config;

/// Load the configured player data and run the configured search.
pub fn run(config: &Config) -> anyhow::Result<SearchReport> {
    let players = players::load_all_from_paths(&config.data)
        .with_context(|| format!("failed to load players from {}", config.data.players))?;

    let pool = PlayerPool::load(players).context("failed to build candidate pool")?;
    let roster = config.roster().context("invalid roster")?;
    let problem = Problem::new(pool, roster, config.contest.salary_cap)
        .context("invalid contest setup")?;
    info!(
        "Contest: {} slots under ${} from {} candidates",
        problem.requirement().total_slots(),
        problem.salary_cap(),
        problem.pool().len()
    );

    let optimizer = Optimizer::new(&problem, config.search_config())
        .context("invalid search configuration")?;
    let report = optimizer.run().context("lineup search failed")?;
    Ok(report)
}
