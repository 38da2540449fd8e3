// Core types shared across the simulation.
//
// Defines the grid coordinate (`GridCoord`) used by every spatial query and
// entity. Coordinates are signed so that a delta applied at the border can be
// represented and rejected by `World::is_valid_position()` instead of
// wrapping.
//
// See also: `direction.rs` for the symbolic directions that map onto grid
// deltas, `world.rs` for bounds checking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell of the forest grid. `x` grows to the right, `y` grows downward.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two coordinates. Saturates at `u32::MAX`.
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// The coordinate shifted by `(dx, dy)`, clamped to the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
