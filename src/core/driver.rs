use serde::{Deserialize, Serialize};

/// Decides which end of the lot a vehicle is placed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverType {
    /// Furthest free slot from the entrance.
    #[default]
    Normal,
    /// Closest free slot to the entrance.
    Handicap,
}
