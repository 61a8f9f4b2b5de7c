// Configuration loading and parsing (lineup.toml).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lineup_core::search::schedule::TemperatureSchedule;
use lineup_core::search::select::{Selection, TieBreak};
use lineup_core::{OptimizerError, RosterRequirement, SearchConfig, StrategyKind};
use serde::Deserialize;
use thiserror::Error;

/// File name looked up in the working directory and in `defaults/`.
pub const CONFIG_FILE: &str = "lineup.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// lineup.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contest: ContestConfig,
    #[serde(default)]
    pub search: SearchSection,
    pub data: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContestConfig {
    #[serde(default = "default_salary_cap")]
    pub salary_cap: u32,
    /// Position string -> required count, e.g. `OF = 3`.
    #[serde(default = "default_roster")]
    pub roster: HashMap<String, usize>,
}

impl Default for ContestConfig {
    fn default() -> Self {
        ContestConfig {
            salary_cap: default_salary_cap(),
            roster: default_roster(),
        }
    }
}

fn default_salary_cap() -> u32 {
    35_000
}

fn default_roster() -> HashMap<String, usize> {
    [("P", 1), ("C", 1), ("1B", 1), ("2B", 1), ("SS", 1), ("3B", 1), ("OF", 3)]
        .into_iter()
        .map(|(pos, count)| (pos.to_string(), count))
        .collect()
}

/// Raw `[search]` table. Every key is optional and falls back to the
/// optimizer's defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub strategy: StrategyKind,
    pub restarts: usize,
    pub trials: usize,
    pub seed: Option<u64>,
    pub selection: Selection,
    pub tie_break: TieBreak,
    pub max_build_attempts: usize,
    pub max_failed_builds: usize,
    pub parallel: bool,
    pub keep_best_seen: bool,
    pub temperature: TemperatureSchedule,
}

impl Default for SearchSection {
    fn default() -> Self {
        let base = SearchConfig::default();
        SearchSection {
            strategy: base.strategy,
            restarts: base.restarts,
            trials: base.trials,
            seed: base.seed,
            selection: base.selection,
            tie_break: base.tie_break,
            max_build_attempts: base.max_build_attempts,
            max_failed_builds: base.max_failed_builds,
            parallel: base.parallel,
            keep_best_seen: base.keep_best_seen,
            temperature: base.schedule,
        }
    }
}

impl SearchSection {
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            strategy: self.strategy,
            restarts: self.restarts,
            trials: self.trials,
            schedule: self.temperature,
            selection: self.selection,
            tie_break: self.tie_break,
            max_build_attempts: self.max_build_attempts,
            max_failed_builds: self.max_failed_builds,
            parallel: self.parallel,
            keep_best_seen: self.keep_best_seen,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Salary sheet: `Name,Position,Salary[,Projection]`.
    pub players: String,
    /// Optional separate `Name,Projection` sheet joined onto `players`.
    #[serde(default)]
    pub projections: Option<String>,
}

impl Config {
    /// Parsed roster requirement. Only fails for configs that skipped
    /// validation.
    pub fn roster(&self) -> Result<RosterRequirement, ConfigError> {
        RosterRequirement::from_config(&self.contest.roster)
            .map_err(|e| core_validation_error("contest", e))
    }

    pub fn search_config(&self) -> SearchConfig {
        self.search.to_search_config()
    }

    /// Resolve data paths against the directory the config file lives in.
    pub fn resolve_data_paths(&mut self, base_dir: &Path) {
        let resolve = |p: &str| base_dir.join(p).display().to_string();
        self.data.players = resolve(&self.data.players);
        self.data.projections = self.data.projections.as_deref().map(resolve);
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate a config file without touching `defaults/`.
///
/// Relative data paths are resolved against the config file's directory.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = read_file(path)?;
    let mut config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate(&config)?;

    if let Some(base_dir) = path.parent() {
        config.resolve_data_paths(base_dir);
    }
    Ok(config)
}

/// Copy `defaults_dir/lineup.toml` to `path` if `path` does not exist yet.
/// Returns whether a file was written.
pub fn ensure_config_file(path: &Path, defaults_dir: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }

    let default_path = defaults_dir.join(CONFIG_FILE);
    if !default_path.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "{} does not exist and no default found at {}; \
                 run from the project root or ensure defaults/ is present",
                path.display(),
                default_path.display()
            ),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", parent.display()),
        })?;
    }

    let content = std::fs::read(&default_path).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", default_path.display()),
    })?;

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", path.display()),
                }
            })?;
            Ok(true)
        }
        // Created concurrently; keep the existing file.
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", path.display()),
        }),
    }
}

/// Convenience wrapper: loads an explicitly named config, or `lineup.toml`
/// in the working directory. Only the implicit file is copied from
/// `defaults/` when missing; a named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load_config_from(path);
    }
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    let path = cwd.join(CONFIG_FILE);
    ensure_config_file(&path, &cwd.join("defaults"))?;
    load_config_from(&path)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Re-key a core validation error under the TOML table it came from.
fn core_validation_error(table: &str, err: OptimizerError) -> ConfigError {
    match err {
        OptimizerError::InvalidConfiguration { field, message } => {
            let field = if field.starts_with(&format!("{table}.")) {
                field
            } else {
                format!("{table}.{field}")
            };
            ConfigError::ValidationError { field, message }
        }
        other => ConfigError::ValidationError {
            field: table.to_string(),
            message: other.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.contest.salary_cap == 0 {
        return Err(ConfigError::ValidationError {
            field: "contest.salary_cap".into(),
            message: "must be greater than 0".into(),
        });
    }

    config.roster()?;

    config
        .search_config()
        .validate()
        .map_err(|e| core_validation_error("search", e))?;

    if config.data.players.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.players".into(),
            message: "must name a CSV file".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
