//! Clamped servo angle.

use crate::level::Direction;

/// Servo angle in degrees, always within `[Position::MIN, Position::MAX]`.
///
/// Every constructor and mutation saturates at the bounds; there is no way
/// to build an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position(u16);

impl Position {
    /// Lowest reachable angle.
    pub const MIN: Self = Self(0);
    /// Highest reachable angle.
    pub const MAX: Self = Self(180);
    /// Degrees moved per recognized encoder edge.
    pub const STEP: u16 = 5;

    /// Create a position, clamping `degrees` to the valid range.
    #[must_use]
    pub const fn new(degrees: u16) -> Self {
        if degrees > Self::MAX.0 {
            Self::MAX
        } else {
            Self(degrees)
        }
    }

    /// Angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        self.0
    }

    /// Move one step in `direction`, saturating at either bound.
    #[must_use]
    pub fn advance(self, direction: Direction) -> Self {
        match direction {
            Direction::Clockwise => Self::new(self.0.saturating_add(Self::STEP)),
            Direction::CounterClockwise => Self(self.0.saturating_sub(Self::STEP)),
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}°", self.0)
    }
}
