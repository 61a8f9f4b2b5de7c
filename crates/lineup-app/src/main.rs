// Lineup optimizer entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries only the report)
// 2. Load config (first argument, or lineup.toml in the working directory)
// 3. Load players, run the configured search
// 4. Print the search report as JSON

use std::path::PathBuf;

use anyhow::Context;
use lineup_app::config;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())
        .context("failed to load configuration")?;
    info!(
        "Config loaded: ${} salary cap, {:?} search, players from {}",
        config.contest.salary_cap, config.search.strategy, config.data.players
    );

    let report = lineup_app::run(&config)?;

    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");

    Ok(())
}

/// Initialize tracing to stderr.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("lineup=info,lineup_app=info,lineup_core=info,warn")
        }))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
