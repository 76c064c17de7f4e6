//! Optimization direction shared by both reward models.

use std::cmp::Ordering;

/// Whether lower or higher values of the latent quantity are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Lower is better (travel time, cost, failure rate).
    #[default]
    Minimize,
    /// Higher is better (success rate, revenue).
    Maximize,
}

impl Direction {
    /// `true` for [`Direction::Minimize`].
    pub fn is_minimize(self) -> bool {
        matches!(self, Direction::Minimize)
    }

    /// Build from the `minimize` flag collaborators usually carry around.
    pub fn from_minimize(minimize: bool) -> Self {
        if minimize {
            Direction::Minimize
        } else {
            Direction::Maximize
        }
    }

    /// Order two ranking keys so that the preferred one sorts first.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Direction::Minimize => a.total_cmp(&b),
            Direction::Maximize => b.total_cmp(&a),
        }
    }
}
