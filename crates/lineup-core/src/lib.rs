// Salary-capped lineup optimizer.
//
// Library root: the candidate pool, lineup construction, swap neighborhoods
// and the two search strategies (random restart, simulated annealing).

pub mod builder;
pub mod error;
pub mod neighbors;
pub mod player;
pub mod pool;
pub mod position;
pub mod problem;
pub mod roster;
pub mod search;
pub mod team;

pub use error::{Infeasibility, OptimizerError};
pub use player::{Player, PlayerId};
pub use pool::PlayerPool;
pub use position::Position;
pub use problem::Problem;
pub use roster::RosterRequirement;
pub use search::{Optimizer, SearchConfig, SearchReport, StrategyKind};
pub use team::{Team, TeamResult};
