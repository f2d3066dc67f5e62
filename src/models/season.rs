use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Calendar season, Southern-Hemisphere convention.
///
/// The observation data comes from São Paulo, so December through
/// February is summer, not winter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    /// Season containing the given month (1-12).
    ///
    /// Fixed 3-month blocks: Dec-Feb Summer, Mar-May Autumn, Jun-Aug
    /// Winter, Sep-Nov Spring.
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Summer,
            3..=5 => Season::Autumn,
            6..=8 => Season::Winter,
            _ => Season::Spring,
        }
    }

    /// Season in effect at the given instant.
    pub fn on(date: DateTime<Utc>) -> Season {
        Season::from_month(date.month())
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
        };
        write!(f, "{}", label)
    }
}
