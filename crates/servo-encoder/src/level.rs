//! Digital sample levels and rotation direction.

/// Logic level of a single digital input sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Line reads `0`.
    #[default]
    Low,
    /// Line reads `1`.
    High,
}

impl Level {
    /// Parse an ASCII level byte as exposed by value registers.
    ///
    /// Only `b'0'` and `b'1'` are accepted.
    #[must_use]
    pub fn from_raw(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Self::Low),
            b'1' => Some(Self::High),
            _ => None,
        }
    }

    /// Numeric value of the level (0 or 1).
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value { Self::High } else { Self::Low }
    }
}

impl core::fmt::Display for Level {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Rotation direction inferred on a rising clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Data line was low at the edge; position grows.
    Clockwise,
    /// Data line was high at the edge; position shrinks.
    CounterClockwise,
}

impl Direction {
    /// Direction encoded by the data level sampled at a rising clock edge.
    #[must_use]
    pub fn from_data(data: Level) -> Self {
        match data {
            Level::Low => Self::Clockwise,
            Level::High => Self::CounterClockwise,
        }
    }

    /// Get the direction as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clockwise => "cw",
            Self::CounterClockwise => "ccw",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
