// Symbolic directions and their grid deltas.
//
// The player drives the hedgehog with screen directions (`up`, `down`,
// `left`, `right`); NPC advice speaks in compass directions (`north`,
// `south`, `east`, `west`). Both vocabularies map onto the same four unit
// deltas. `y` grows downward, so `up`/`north` is `(0, -1)`.
//
// Parsing is case-insensitive. `FromStr` rejects unknown tokens with
// `SimError::UnknownDirection`; `parse_lenient` falls back to `right`, which
// is what loosely-wired input layers expect.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    North,
    South,
    East,
    West,
}

/// The compass set NPCs choose from when they give advice.
pub const ADVICE_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

impl Direction {
    /// Unit grid delta `(dx, dy)` for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up | Direction::North => (0, -1),
            Direction::Down | Direction::South => (0, 1),
            Direction::Left | Direction::West => (-1, 0),
            Direction::Right | Direction::East => (1, 0),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    /// Parse a direction token, treating anything unrecognised as `right`.
    pub fn parse_lenient(token: &str) -> Self {
        token.parse().unwrap_or(Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "north" => Ok(Direction::North),
            "south" => Ok(Direction::South),
            "east" => Ok(Direction::East),
            "west" => Ok(Direction::West),
            _ => Err(SimError::UnknownDirection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_share_deltas() {
        assert_eq!(Direction::Up.delta(), Direction::North.delta());
        assert_eq!(Direction::Down.delta(), Direction::South.delta());
        assert_eq!(Direction::Left.delta(), Direction::West.delta());
        assert_eq!(Direction::Right.delta(), Direction::East.delta());
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!(" West ".parse::<Direction>().unwrap(), Direction::West);
    }

    #[test]
    fn unknown_token_is_an_error_but_lenient_parse_goes_right() {
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(SimError::UnknownDirection(_))
        ));
        assert_eq!(Direction::parse_lenient("sideways"), Direction::Right);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Direction::North).unwrap();
        assert_eq!(json, "\"north\"");
        let back: Direction = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(back, Direction::Left);
    }
}
