// Position classes a daily lineup is built from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roster slot categories for a daily baseball lineup.
///
/// Outfielders are a single class: daily contests fill "OF" slots with any
/// of LF/CF/RF, so the pool does not distinguish them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Pitcher,
    Catcher,
    FirstBase,
    SecondBase,
    ShortStop,
    ThirdBase,
    Outfield,
}

/// Every position class, in display order.
pub const ALL_POSITIONS: &[Position] = &[
    Position::Pitcher,
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ShortStop,
    Position::ThirdBase,
    Position::Outfield,
];

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Accepts the abbreviations used by salary exports:
    /// - "P", "SP", "RP" -> Pitcher
    /// - "1B" -> FirstBase, "2B" -> SecondBase, "3B" -> ThirdBase
    /// - "OF", "LF", "CF", "RF" -> Outfield
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "P" | "SP" | "RP" => Some(Position::Pitcher),
            "C" => Some(Position::Catcher),
            "1B" => Some(Position::FirstBase),
            "2B" => Some(Position::SecondBase),
            "SS" => Some(Position::ShortStop),
            "3B" => Some(Position::ThirdBase),
            "OF" | "LF" | "CF" | "RF" => Some(Position::Outfield),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Pitcher => "P",
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ShortStop => "SS",
            Position::ThirdBase => "3B",
            Position::Outfield => "OF",
        }
    }

    /// Deterministic ordering index for slot layout and reports.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Pitcher => 0,
            Position::Catcher => 1,
            Position::FirstBase => 2,
            Position::SecondBase => 3,
            Position::ShortStop => 4,
            Position::ThirdBase => 5,
            Position::Outfield => 6,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}
