//! Semantic value types shared by motors and vehicles.

use core::fmt;
use core::ops::Not;

use crate::hal::Level;

/// Full-scale duty value of the 8-bit speed model.
pub const MAX_DUTY: u32 = 255;

/// Logical direction of travel.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the front of the vehicle.
    Forward,
    /// Towards the back of the vehicle.
    Backward,
}

impl Not for Direction {
    type Output = Direction;

    fn not(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

/// Mounting side of a motor on a vehicle.
///
/// By convention M0 is [`Side::Left`] and M1 is [`Side::Right`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// M0.
    Left,
    /// M1.
    Right,
}

impl Side {
    /// The other side.
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Which direction-output level moves a motor forward.
///
/// Corrects for motors mounted mirrored or wired in reverse, so that
/// [`Direction::Forward`] means the same thing for every motor of a vehicle.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// A high direction output drives forward.
    #[default]
    ForwardHigh,
    /// A low direction output drives forward.
    ForwardLow,
}

impl Polarity {
    /// Direction-output level that produces `direction`.
    pub const fn level_for(self, direction: Direction) -> Level {
        match (self, direction) {
            (Polarity::ForwardHigh, Direction::Forward)
            | (Polarity::ForwardLow, Direction::Backward) => Level::High,
            (Polarity::ForwardHigh, Direction::Backward)
            | (Polarity::ForwardLow, Direction::Forward) => Level::Low,
        }
    }

    /// Direction produced by a direction-output `level`.
    pub const fn direction_for(self, level: Level) -> Direction {
        match (self, level) {
            (Polarity::ForwardHigh, Level::High) | (Polarity::ForwardLow, Level::Low) => {
                Direction::Forward
            }
            (Polarity::ForwardHigh, Level::Low) | (Polarity::ForwardLow, Level::High) => {
                Direction::Backward
            }
        }
    }

    /// Level that drives forward under this polarity.
    pub const fn forward_level(self) -> Level {
        self.level_for(Direction::Forward)
    }
}

impl From<Level> for Polarity {
    /// Polarity whose forward level is `level`.
    fn from(level: Level) -> Self {
        match level {
            Level::High => Polarity::ForwardHigh,
            Level::Low => Polarity::ForwardLow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_levels() {
        assert_eq!(Polarity::ForwardHigh.level_for(Direction::Forward), Level::High);
        assert_eq!(Polarity::ForwardHigh.level_for(Direction::Backward), Level::Low);
        assert_eq!(Polarity::ForwardLow.level_for(Direction::Forward), Level::Low);
        assert_eq!(Polarity::ForwardLow.level_for(Direction::Backward), Level::High);
    }

    #[test]
    fn test_polarity_read_back_inverts_level_for() {
        for polarity in [Polarity::ForwardHigh, Polarity::ForwardLow] {
            for direction in [Direction::Forward, Direction::Backward] {
                let level = polarity.level_for(direction);
                assert_eq!(polarity.direction_for(level), direction);
            }
        }
    }

    #[test]
    fn test_polarity_from_level() {
        assert_eq!(Polarity::from(Level::High), Polarity::ForwardHigh);
        assert_eq!(Polarity::from(Level::Low).forward_level(), Level::Low);
    }

    #[test]
    fn test_negation() {
        assert_eq!(!Direction::Forward, Direction::Backward);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }
}
