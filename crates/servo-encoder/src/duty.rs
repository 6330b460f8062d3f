//! Position to PWM duty-cycle mapping.

use crate::position::Position;

/// PWM on-time in nanoseconds, always within the servo's safe pulse range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DutyCycle(u32);

impl DutyCycle {
    /// Shortest pulse the servo accepts (0°).
    pub const MIN: Self = Self(500_000);
    /// Longest pulse the servo accepts (180°).
    pub const MAX: Self = Self(2_500_000);

    /// Create a duty cycle, clamping `nanos` to the safe range.
    #[must_use]
    pub const fn clamped(nanos: u32) -> Self {
        if nanos < Self::MIN.0 {
            Self::MIN
        } else if nanos > Self::MAX.0 {
            Self::MAX
        } else {
            Self(nanos)
        }
    }

    /// On-time in nanoseconds.
    #[must_use]
    pub const fn as_nanos(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for DutyCycle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Map a position linearly onto `[DutyCycle::MIN, DutyCycle::MAX]`.
///
/// Uses truncating integer division, so `duty_for_position(Position::new(5))`
/// is 555 555 ns. The result is clamped even though no valid [`Position`]
/// can leave the range.
#[must_use]
pub fn duty_for_position(position: Position) -> DutyCycle {
    let span = DutyCycle::MAX.0 - DutyCycle::MIN.0;
    let offset = u32::from(position.degrees()) * span / u32::from(Position::MAX.degrees());
    DutyCycle::clamped(DutyCycle::MIN.0.saturating_add(offset))
}
