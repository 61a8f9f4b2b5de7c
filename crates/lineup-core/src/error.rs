// Error types shared by the pool, builder and search strategies.

use thiserror::Error;

use crate::position::Position;
use crate::team::TeamViolation;

/// Why a team could not be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Infeasibility {
    /// Even the cheapest legal composition reaches the cap.
    #[error("cheapest possible team costs ${cheapest}, cap is ${cap} (must stay strictly below)")]
    CapTooLow { cheapest: u64, cap: u32 },

    /// The pool holds fewer players of a class than the roster requires.
    #[error("only {available} {position} candidates for {required} required slots")]
    ClassExhausted {
        position: Position,
        available: usize,
        required: usize,
    },

    /// A team may exist but random construction never produced one.
    #[error("random construction did not produce a team under the cap")]
    RetriesExhausted,
}

impl Infeasibility {
    /// Whether retrying can ever succeed. Structural failures are detected
    /// from the pool alone and no amount of resampling fixes them.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Infeasibility::RetriesExhausted)
    }
}

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("duplicate player name in pool: {name}")]
    DuplicateName { name: String },

    #[error("invalid player {name}: {reason}")]
    InvalidPlayer { name: String, reason: String },

    #[error("invalid configuration for `{field}`: {message}")]
    InvalidConfiguration { field: String, message: String },

    #[error("no valid team after {attempts} construction attempts: {reason}")]
    ConstraintUnsatisfiable {
        attempts: usize,
        reason: Infeasibility,
    },

    #[error("giving up after {failures} failed team builds (limit {limit})")]
    TooManyFailedBuilds { failures: usize, limit: usize },

    #[error("search produced an invalid lineup: {0}")]
    InvalidTeam(TeamViolation),
}

impl OptimizerError {
    pub(crate) fn config(field: &str, message: impl Into<String>) -> Self {
        OptimizerError::InvalidConfiguration {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
