//! Rising-edge encoder decoding.
//!
//! The decoder only ever sees samples that were read successfully. A failed
//! read is the caller's problem: it must skip [`EncoderDecoder::sample`]
//! entirely so the previous clock level stays the last one actually
//! observed.

use crate::level::{Direction, Level};
use crate::position::Position;

/// Pure encoder transition.
///
/// Returns `position` advanced by one step when `prev_clock -> clock` is a
/// rising edge, and `position` unchanged otherwise. Direction comes from
/// `data` at the edge.
#[must_use]
pub fn step(prev_clock: Level, clock: Level, data: Level, position: Position) -> Position {
    if is_rising_edge(prev_clock, clock) {
        position.advance(Direction::from_data(data))
    } else {
        position
    }
}

fn is_rising_edge(prev_clock: Level, clock: Level) -> bool {
    prev_clock == Level::Low && clock == Level::High
}

/// Edge-detection memory carried between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderState {
    /// Last successfully read clock level, `None` until seeded.
    pub prev_clock: Option<Level>,
}

impl EncoderState {
    /// Returns true once a real clock read has been recorded.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.prev_clock.is_some()
    }
}

/// A recognized rising edge.
///
/// `before == after` when the move was absorbed by clamping; the edge still
/// counts and the caller still owes the PWM a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Direction read from the data line.
    pub direction: Direction,
    /// Position before the edge.
    pub before: Position,
    /// Position after the edge.
    pub after: Position,
}

impl Rotation {
    /// Returns true if the position actually moved.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.before != self.after
    }
}

/// Stateful decoder owning the position counter.
#[derive(Debug, Clone, Default)]
pub struct EncoderDecoder {
    state: EncoderState,
    position: Position,
}

impl EncoderDecoder {
    /// Create an unseeded decoder at [`Position::MIN`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unseeded decoder starting at `position`.
    #[must_use]
    pub fn with_position(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Record an initial clock level without interpreting it as an edge.
    pub fn seed(&mut self, clock: Level) {
        self.state.prev_clock = Some(clock);
    }

    /// Feed one successfully read `(clock, data)` pair.
    ///
    /// Returns the recognized rotation, if any. An unseeded decoder treats
    /// the sample as its seed and reports nothing.
    pub fn sample(&mut self, clock: Level, data: Level) -> Option<Rotation> {
        let prev = self.state.prev_clock.replace(clock)?;
        if !is_rising_edge(prev, clock) {
            return None;
        }

        let before = self.position;
        self.position = step(prev, clock, data, before);

        Some(Rotation {
            direction: Direction::from_data(data),
            before,
            after: self.position,
        })
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current edge-detection state.
    #[must_use]
    pub fn state(&self) -> EncoderState {
        self.state
    }
}
