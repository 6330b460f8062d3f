//! Prelude for rotary-servo-encoder.
//!
//! ```rust
//! use rotary_servo_encoder::prelude::*;
//!
//! let position = step(Level::Low, Level::High, Level::Low, Position::MIN);
//! assert_eq!(duty_for_position(position).as_nanos(), 555_555);
//! ```

pub use crate::decoder::{EncoderDecoder, EncoderState, Rotation, step};
pub use crate::duty::{DutyCycle, duty_for_position};
pub use crate::level::{Direction, Level};
pub use crate::position::Position;
