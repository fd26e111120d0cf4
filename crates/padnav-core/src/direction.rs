#![forbid(unsafe_code)]

//! The four navigation directions.

use std::fmt;
use std::str::FromStr;

/// A directional input request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Ideal bearing in degrees: right 0°, down 90°, left 180°, up −90°.
    #[inline]
    pub const fn angle(self) -> f64 {
        match self {
            Direction::Right => 0.0,
            Direction::Down => 90.0,
            Direction::Left => 180.0,
            Direction::Up => -90.0,
        }
    }

    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// `true` for `Down` and `Right` (increasing coordinate).
    #[inline]
    pub const fn is_forward(self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key name that does not map to any direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    input: String,
}

impl ParseDirectionError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a navigation direction: {:?}", self.input)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts plain names (`"up"`), browser key names (`"ArrowUp"`), and
    /// remote/gamepad names (`"dpad_up"`, `"DPAD_UP"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower
            .strip_prefix("arrow")
            .or_else(|| lower.strip_prefix("dpad_"))
            .or_else(|| lower.strip_prefix("dpad"))
            .unwrap_or(&lower);
        match name {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError {
                input: s.to_string(),
            }),
        }
    }
}
